//! Members of the built-in types.

use std::rc::Rc;

use vela_types::{Prim, Ty};

use crate::error::{index_out_of_bounds, number_format, type_mismatch, RuntimeResult};
use crate::{ClassRegistry, Value};

fn arg(args: &[Value], index: usize) -> RuntimeResult<&Value> {
    args.get(index)
        .ok_or_else(|| type_mismatch("argument", format!("{} arguments", args.len())))
}

fn text(args: &[Value], index: usize) -> RuntimeResult<Rc<str>> {
    arg(args, index)?.as_str().cloned()
}

fn int(args: &[Value], index: usize) -> RuntimeResult<i32> {
    match arg(args, index)? {
        Value::Int(v) => Ok(*v),
        other => Err(type_mismatch("int", other.kind_name())),
    }
}

/// Char-indexed substring; `end` defaults to the length.
fn substring(s: &str, begin: i32, end: Option<i32>) -> RuntimeResult<Value> {
    let length = s.chars().count();
    let end = end.unwrap_or(i32::try_from(length).unwrap_or(i32::MAX));
    let (Ok(b), Ok(e)) = (usize::try_from(begin), usize::try_from(end)) else {
        return Err(index_out_of_bounds(i64::from(begin.min(end)), length));
    };
    if b > e || e > length {
        return Err(index_out_of_bounds(i64::from(end), length));
    }
    Ok(Value::string(s.chars().skip(b).take(e - b).collect::<String>()))
}

pub(crate) fn install(registry: &mut ClassRegistry) {
    install_object(registry);
    install_string(registry);
    install_boxed(registry);
    install_math(registry);
}

fn install_object(registry: &mut ClassRegistry) {
    registry.add_method(Ty::Object, "toString", &[], Ty::Str, |reg, args| {
        Ok(Value::string(reg.to_host_string(arg(args, 0)?)))
    });
    registry.add_method(Ty::Object, "equals", &[Ty::Object], Ty::BOOLEAN, |_, args| {
        Ok(Value::Bool(arg(args, 0)? == arg(args, 1)?))
    });
    registry.add_static_method(Ty::Str, "valueOf", &[Ty::Object], Ty::Str, |reg, args| {
        Ok(Value::string(reg.to_host_string(arg(args, 0)?)))
    });
}

fn install_string(registry: &mut ClassRegistry) {
    registry.add_method(Ty::Str, "length", &[], Ty::INT, |_, args| {
        let length = text(args, 0)?.chars().count();
        Ok(Value::Int(i32::try_from(length).unwrap_or(i32::MAX)))
    });
    registry.add_method(Ty::Str, "isEmpty", &[], Ty::BOOLEAN, |_, args| {
        Ok(Value::Bool(text(args, 0)?.is_empty()))
    });
    registry.add_method(Ty::Str, "charAt", &[Ty::INT], Ty::Prim(Prim::Char), |_, args| {
        let s = text(args, 0)?;
        let index = int(args, 1)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map(Value::Char)
            .ok_or_else(|| index_out_of_bounds(i64::from(index), s.chars().count()))
    });
    registry.add_method(Ty::Str, "substring", &[Ty::INT], Ty::Str, |_, args| {
        substring(&text(args, 0)?, int(args, 1)?, None)
    });
    registry.add_method(Ty::Str, "substring", &[Ty::INT, Ty::INT], Ty::Str, |_, args| {
        substring(&text(args, 0)?, int(args, 1)?, Some(int(args, 2)?))
    });
    registry.add_method(Ty::Str, "toUpperCase", &[], Ty::Str, |_, args| {
        Ok(Value::string(text(args, 0)?.to_uppercase()))
    });
    registry.add_method(Ty::Str, "toLowerCase", &[], Ty::Str, |_, args| {
        Ok(Value::string(text(args, 0)?.to_lowercase()))
    });
    registry.add_method(Ty::Str, "trim", &[], Ty::Str, |_, args| {
        Ok(Value::string(text(args, 0)?.trim()))
    });
    registry.add_method(Ty::Str, "contains", &[Ty::Str], Ty::BOOLEAN, |_, args| {
        Ok(Value::Bool(text(args, 0)?.contains(&*text(args, 1)?)))
    });
    registry.add_method(Ty::Str, "startsWith", &[Ty::Str], Ty::BOOLEAN, |_, args| {
        Ok(Value::Bool(text(args, 0)?.starts_with(&*text(args, 1)?)))
    });
    registry.add_method(Ty::Str, "concat", &[Ty::Str], Ty::Str, |_, args| {
        Ok(Value::string(format!("{}{}", text(args, 0)?, text(args, 1)?)))
    });
}

fn install_boxed(registry: &mut ClassRegistry) {
    let integer = Ty::Boxed(Prim::Int);
    registry.add_static_method(integer, "parseInt", &[Ty::Str], Ty::INT, |_, args| {
        let s = text(args, 0)?;
        s.parse::<i32>()
            .map(Value::Int)
            .map_err(|_| number_format(&s, "int"))
    });
    registry.add_static_field(integer, "MAX_VALUE", Ty::INT, Value::Int(i32::MAX));
    registry.add_static_field(integer, "MIN_VALUE", Ty::INT, Value::Int(i32::MIN));
    registry.add_static_field(
        Ty::Boxed(Prim::Long),
        "MAX_VALUE",
        Ty::LONG,
        Value::Long(i64::MAX),
    );
}

fn install_math(registry: &mut ClassRegistry) {
    let math = Ty::Class(registry.define_class("Math", None));
    registry.add_static_method(math, "max", &[Ty::INT, Ty::INT], Ty::INT, |_, args| {
        Ok(Value::Int(int(args, 0)?.max(int(args, 1)?)))
    });
    registry.add_static_method(math, "max", &[Ty::LONG, Ty::LONG], Ty::LONG, |_, args| {
        Ok(Value::Long(arg(args, 0)?.as_i64()?.max(arg(args, 1)?.as_i64()?)))
    });
    registry.add_static_method(math, "max", &[Ty::DOUBLE, Ty::DOUBLE], Ty::DOUBLE, |_, args| {
        Ok(Value::Double(arg(args, 0)?.as_f64()?.max(arg(args, 1)?.as_f64()?)))
    });
    registry.add_static_method(math, "min", &[Ty::INT, Ty::INT], Ty::INT, |_, args| {
        Ok(Value::Int(int(args, 0)?.min(int(args, 1)?)))
    });
    registry.add_static_method(math, "abs", &[Ty::INT], Ty::INT, |_, args| {
        Ok(Value::Int(int(args, 0)?.wrapping_abs()))
    });
    registry.add_static_method(math, "abs", &[Ty::DOUBLE], Ty::DOUBLE, |_, args| {
        Ok(Value::Double(arg(args, 0)?.as_f64()?.abs()))
    });
    registry.add_static_field(math, "PI", Ty::DOUBLE, Value::Double(std::f64::consts::PI));
}
