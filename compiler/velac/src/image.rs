//! Binary unit images.
//!
//! A unit compiled with [`Encoding::Image`](crate::Encoding::Image) ships
//! as one bincode blob holding a [`SiteImage`] per binding site, in site
//! order. Class, method and field handles inside the routines refer to the
//! type model the unit was compiled against; an image is only meaningful to
//! a host with the same model.

use serde::{Deserialize, Serialize};
use vela_bind::CompiledBinding;
use vela_diagnostic::{assembly_failed, CompileResult};
use vela_emit::{ArtifactImage, Routine};

use crate::session::CompiledSite;

/// The runnable form of one binding site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SiteImage {
    /// Evaluated once in the host frame.
    Static { name: String, routine: Routine },
    Dynamic { name: String, image: ArtifactImage },
    /// Compiled again once its pending scope entry is bound.
    Deferred { name: String, source: String },
}

impl SiteImage {
    pub fn name(&self) -> &str {
        match self {
            SiteImage::Static { name, .. }
            | SiteImage::Dynamic { name, .. }
            | SiteImage::Deferred { name, .. } => name,
        }
    }

    fn of(compiled: &CompiledSite) -> CompileResult<Self> {
        let name = compiled.site.describe();
        Ok(match &compiled.binding {
            CompiledBinding::Static(binding) => SiteImage::Static {
                name,
                routine: binding.routine()?,
            },
            CompiledBinding::Dynamic(artifact) => SiteImage::Dynamic {
                name,
                image: artifact.image.clone(),
            },
            CompiledBinding::Deferred { .. } => SiteImage::Deferred {
                name,
                source: compiled.site.source.clone(),
            },
        })
    }
}

pub fn encode(sites: &[CompiledSite]) -> CompileResult<Vec<u8>> {
    let images = sites
        .iter()
        .map(SiteImage::of)
        .collect::<CompileResult<Vec<_>>>()?;
    bincode::serialize(&images).map_err(|error| assembly_failed(error.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<Vec<SiteImage>, bincode::Error> {
    bincode::deserialize(bytes)
}
