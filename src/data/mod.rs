pub mod loader;
pub mod unit;
pub mod validate;

pub use loader::{resolve_unit, resolve_unit_in, resolve_unit_with_index};
pub use unit::{
    load_unit_dir, load_unit_file, load_unit_index, load_unit_record, units_dir, LoadError,
    UnitIndex, UnitIndexEntry, UnitRecord,
};
pub use validate::{
    validate_unit_file, validate_unit_value, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};
