//! Cross-unit compile sessions.
//!
//! A unit compiles its includes first, depth first. The session keeps the
//! units being compiled on an explicit task stack: requesting a unit that
//! is already on the stack is an include cycle, reported with the chain of
//! locations that closes it.
//!
//! Finished units are memoized by location and encoding, so a unit included
//! from several places compiles once per encoding. A failed unit is never
//! memoized; units that finished before the failure stay memoized.

use std::fmt::Write;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use vela_bind::{compile_binding, CompiledBinding};
use vela_diagnostic::{include_cycle, unit_not_found, CompileResult};
use vela_types::TypeModel;

use crate::image;
use crate::options::{CompileOptions, Encoding};
use crate::unit::{BindingSite, Unit, UnitLoader};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TaskKey {
    location: String,
    encoding: Encoding,
}

/// A compiled binding and the site it came from.
#[derive(Clone, Debug)]
pub struct CompiledSite {
    pub site: BindingSite,
    pub binding: CompiledBinding,
}

/// A unit's bindings in the requested encoding.
#[derive(Clone, Debug)]
pub enum UnitOutput {
    Artifacts(Vec<CompiledSite>),
    Listing(String),
    Image(Vec<u8>),
}

#[derive(Clone, Debug)]
pub struct CompiledUnit {
    pub location: String,
    pub encoding: Encoding,
    pub includes: Vec<Rc<CompiledUnit>>,
    pub output: UnitOutput,
}

pub struct CompileSession<'a> {
    model: &'a dyn TypeModel,
    loader: &'a dyn UnitLoader,
    options: CompileOptions,
    stack: Vec<TaskKey>,
    done: FxHashMap<TaskKey, Rc<CompiledUnit>>,
}

impl<'a> CompileSession<'a> {
    pub fn new(model: &'a dyn TypeModel, loader: &'a dyn UnitLoader) -> Self {
        CompileSession {
            model,
            loader,
            options: CompileOptions::default(),
            stack: Vec::new(),
            done: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `location` in the default encoding.
    pub fn compile(&mut self, location: &str) -> CompileResult<Rc<CompiledUnit>> {
        self.compile_as(location, self.options.encoding)
    }

    #[instrument(level = "debug", skip(self, encoding), fields(encoding = encoding.name()))]
    pub fn compile_as(
        &mut self,
        location: &str,
        encoding: Encoding,
    ) -> CompileResult<Rc<CompiledUnit>> {
        let key = TaskKey {
            location: location.to_owned(),
            encoding,
        };
        if let Some(unit) = self.done.get(&key) {
            debug!("memoized");
            return Ok(Rc::clone(unit));
        }
        if let Some(start) = self.stack.iter().position(|task| *task == key) {
            let chain = self.stack[start..]
                .iter()
                .map(|task| task.location.clone())
                .chain(std::iter::once(key.location))
                .collect();
            return Err(include_cycle(chain));
        }

        self.stack.push(key.clone());
        let result = self.run(&key);
        self.stack.pop();

        let unit = Rc::new(result?);
        self.done.insert(key, Rc::clone(&unit));
        Ok(unit)
    }

    /// Whether `location` has finished compiling in `encoding`.
    pub fn is_memoized(&self, location: &str, encoding: Encoding) -> bool {
        self.done.contains_key(&TaskKey {
            location: location.to_owned(),
            encoding,
        })
    }

    fn run(&mut self, key: &TaskKey) -> CompileResult<CompiledUnit> {
        let unit = self
            .loader
            .load(&key.location)
            .ok_or_else(|| unit_not_found(&key.location))?;
        let includes = unit
            .includes
            .iter()
            .map(|include| self.compile_as(include, key.encoding))
            .collect::<CompileResult<Vec<_>>>()?;
        let sites = self.compile_sites(&unit)?;
        debug!(
            location = %key.location,
            sites = sites.len(),
            includes = includes.len(),
            "unit compiled"
        );
        let output = match key.encoding {
            Encoding::Artifact => UnitOutput::Artifacts(sites),
            Encoding::Listing => UnitOutput::Listing(self.listing(&sites)?),
            Encoding::Image => UnitOutput::Image(image::encode(&sites)?),
        };
        Ok(CompiledUnit {
            location: key.location.clone(),
            encoding: key.encoding,
            includes,
            output,
        })
    }

    fn compile_sites(&self, unit: &Unit) -> CompileResult<Vec<CompiledSite>> {
        let cx = self.options.cx(self.model);
        unit.sites
            .iter()
            .map(|site| {
                let binding = compile_binding(&site.source, &unit.scope, &cx, site.target.as_ref())?;
                Ok(CompiledSite {
                    site: site.clone(),
                    binding,
                })
            })
            .collect()
    }

    fn listing(&self, sites: &[CompiledSite]) -> CompileResult<String> {
        let mut out = String::new();
        for compiled in sites {
            let name = compiled.site.describe();
            match &compiled.binding {
                CompiledBinding::Static(binding) => {
                    let ty = vela_types::display(self.model, binding.ty);
                    let _ = writeln!(out, "# {name}: static {ty}");
                    out.push_str(&binding.routine()?.disassemble());
                }
                CompiledBinding::Dynamic(artifact) => {
                    let ty = vela_types::display(self.model, artifact.ty);
                    let image = &artifact.image;
                    let _ = writeln!(out, "# {name}: dynamic {ty}");
                    let _ = writeln!(
                        out,
                        "captures {} scratch {} counters {} flags {:?} steps {:?}",
                        image.captures, image.scratch, image.counters, image.flags, image.steps
                    );
                    out.push_str("init:\n");
                    out.push_str(&image.init.disassemble());
                    out.push_str("update:\n");
                    out.push_str(&image.update.disassemble());
                }
                CompiledBinding::Deferred { ty } => {
                    let ty = vela_types::display(self.model, *ty);
                    let _ = writeln!(out, "# {name}: deferred {ty}");
                }
            }
        }
        Ok(out)
    }
}
