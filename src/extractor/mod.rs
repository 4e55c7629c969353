use schemars::{schema_for, JsonSchema};

use crate::error::{ErrorVerbosity, InternalServerError};

pub mod api_key;
pub mod json;
pub mod path;
pub mod query;
pub mod valid_api_key;
pub mod validated;

/// Gives access to the data an extractor produced, e.g. to validate it.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}

/// YAML rendering of `T`'s JSON schema, shown to clients next to a rejection.
fn expected_schema<T: JsonSchema>(verbosity: ErrorVerbosity) -> Result<String, InternalServerError> {
    serde_yaml::to_string(&schema_for!(T))
        .map_err(|err| InternalServerError::from_generic_error(verbosity, err))
}
