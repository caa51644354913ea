use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{Schema, TypeKind, TypeRef};
use crate::utils::quote;

/// Builtin type names. These resolve without a model declaration and are
/// reserved: no model may take one of them as its name. `json` and `raw`
/// denote opaque payloads to the code generators.
pub const BUILTIN_TYPES: [&str; 5] = ["string", "int", "bool", "json", "raw"];

/// Check a fully built schema: model and rpc names unique (in separate
/// namespaces), field/parameter names unique per declaration, and every
/// identifier type resolved against the builtins plus the complete model
/// set. Forward references are fine; declaration order never matters.
/// Stops at the first violation.
pub fn validate_schema(schema: &Schema) -> Result<(), ValidationError> {
    let mut model_names: HashSet<&str> = HashSet::new();
    for model in &schema.models {
        if BUILTIN_TYPES.contains(&model.name.as_str()) {
            return Err(ValidationError::ReservedModelName(model.name.clone()));
        }
        if !model_names.insert(&model.name) {
            return Err(ValidationError::DuplicateModel(model.name.clone()));
        }
    }

    let mut rpc_names: HashSet<&str> = HashSet::new();
    for rpc in &schema.rpcs {
        if !rpc_names.insert(&rpc.name) {
            return Err(ValidationError::DuplicateRpc(rpc.name.clone()));
        }
    }

    for model in &schema.models {
        let mut field_names: HashSet<&str> = HashSet::new();
        for field in &model.fields {
            if !field_names.insert(&field.name) {
                return Err(ValidationError::DuplicateField {
                    model: model.name.clone(),
                    field: field.name.clone(),
                });
            }
            resolve_type(&field.type_, &BUILTIN_TYPES, &model_names, || {
                format!("field {} of model {}", quote(&field.name), quote(&model.name))
            })?;
        }
    }

    for rpc in &schema.rpcs {
        let mut param_names: HashSet<&str> = HashSet::new();
        for param in &rpc.parameters {
            if !param_names.insert(&param.name) {
                return Err(ValidationError::DuplicateParameter {
                    rpc:   rpc.name.clone(),
                    param: param.name.clone(),
                });
            }
            resolve_type(&param.type_, &BUILTIN_TYPES, &model_names, || {
                format!("parameter {} of rpc {}", quote(&param.name), quote(&rpc.name))
            })?;
        }
        if let Some(returns) = &rpc.returns {
            resolve_type(returns, &BUILTIN_TYPES, &model_names, || {
                format!("the return type of rpc {}", quote(&rpc.name))
            })?;
        }
    }

    Ok(())
}

/// Recurse through `list`/`map` wrappers down to the innermost identifier
/// and require it to be a builtin or a declared model.
fn resolve_type(
    type_: &TypeRef,
    builtins: &[&str],
    models: &HashSet<&str>,
    owner: impl Fn() -> String + Copy,
) -> Result<(), ValidationError> {
    match &type_.kind {
        TypeKind::List(elem) => resolve_type(elem, builtins, models, owner),
        TypeKind::Map(value) => resolve_type(value, builtins, models, owner),
        TypeKind::Ident(name) => {
            if builtins.contains(&name.as_str()) || models.contains(name.as_str()) {
                Ok(())
            } else {
                Err(ValidationError::UnknownType {
                    name:  name.clone(),
                    owner: owner(),
                })
            }
        }
    }
}
