// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Export slot normalization

use super::{ExportRecord, LEGACY_EXPORT, PRIMARY_EXPORT};
use crate::error::LoaderError;
use crate::value::LoadedValue;

/// Which export slot carried a module's value
#[derive(Debug)]
pub enum ExportShape {
    /// The ESM `default` export
    Primary(LoadedValue),
    /// The CommonJS `module.exports` value
    Legacy(LoadedValue),
    /// No slot, or the slot holds no value
    Missing,
}

impl ExportShape {
    /// Pick the export slot of a record, dropping every other binding
    ///
    /// A declared primary slot wins over the legacy one.
    pub fn from_record(mut record: ExportRecord) -> Self {
        if let Some(slot) = record.take(PRIMARY_EXPORT) {
            return slot.map_or(ExportShape::Missing, ExportShape::Primary);
        }
        if let Some(slot) = record.take(LEGACY_EXPORT) {
            return slot.map_or(ExportShape::Missing, ExportShape::Legacy);
        }
        ExportShape::Missing
    }

    /// Extract the value, failing with `REQUIRED_DEFAULT_EXPORT`
    pub fn into_value(self) -> Result<LoadedValue, LoaderError> {
        match self {
            ExportShape::Primary(value) | ExportShape::Legacy(value) => Ok(value),
            ExportShape::Missing => Err(LoaderError::required_default_export()),
        }
    }
}

impl From<ExportRecord> for ExportShape {
    fn from(record: ExportRecord) -> Self {
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_primary_slot() {
        let record = ExportRecord::default_export(json!(42)).with("other", json!(1));
        let shape = ExportShape::from_record(record);
        assert!(matches!(shape, ExportShape::Primary(_)));
        assert_eq!(shape.into_value().unwrap().into_data(), Some(json!(42)));
    }

    #[test]
    fn test_legacy_slot() {
        let shape = ExportShape::from_record(ExportRecord::module_exports(json!([1, 2])));
        assert!(matches!(shape, ExportShape::Legacy(_)));
        assert_eq!(shape.into_value().unwrap().into_data(), Some(json!([1, 2])));
    }

    #[test]
    fn test_primary_wins_over_legacy() {
        let record =
            ExportRecord::module_exports(json!("legacy")).with(PRIMARY_EXPORT, json!("primary"));
        let value = ExportShape::from_record(record).into_value().unwrap();
        assert_eq!(value.into_data(), Some(json!("primary")));
    }

    #[test]
    fn test_missing_slots() {
        let record = ExportRecord::new().with("config", json!({}));
        let err = ExportShape::from_record(record).into_value().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredDefaultExport);
        assert_eq!(err.message(), "Expected module file to be exported as default export");
    }

    #[test]
    fn test_undefined_slot() {
        let record = ExportRecord::new().declare(PRIMARY_EXPORT);
        assert!(matches!(ExportShape::from_record(record), ExportShape::Missing));

        let record = ExportRecord::new().declare(LEGACY_EXPORT);
        assert!(matches!(ExportShape::from_record(record), ExportShape::Missing));
    }
}
