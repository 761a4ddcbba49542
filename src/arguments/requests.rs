//! Typed requests for the four ili2fgdb operations
//!
//! Field names follow the ili2fgdb switches in snake_case. Optional text and
//! path parameters are `Option`s; an empty string counts as unset.

use super::inheritance::InheritanceFlags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Operation switch passed to ili2fgdb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    SchemaImport,
    Import,
    Export,
    Update,
}

impl OperationKind {
    pub fn as_flag(self) -> &'static str {
        match self {
            OperationKind::SchemaImport => "--schemaimport",
            OperationKind::Import => "--import",
            OperationKind::Export => "--export",
            OperationKind::Update => "--update",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::SchemaImport => "schema-import",
            OperationKind::Import => "import",
            OperationKind::Export => "export",
            OperationKind::Update => "update",
        };
        f.write_str(name)
    }
}

fn default_true() -> bool {
    true
}

/// Default spatial reference and XY precision of new feature classes
///
/// Defaults match `SpatialReference(2056)` (CH1903+ / LV95).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialReference {
    /// Authority, always passed upper-case
    pub default_srs_auth: String,
    pub default_srs_code: u32,
    pub fgdb_xy_resolution: f64,
    pub fgdb_xy_tolerance: f64,
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self {
            default_srs_auth: "epsg".to_string(),
            default_srs_code: 2056,
            fgdb_xy_resolution: 0.0001,
            fgdb_xy_tolerance: 0.001,
        }
    }
}

/// Create an empty geodatabase with the schema of an INTERLIS model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaImportRequest {
    /// Geodatabase to create; must not exist yet and must end with `.gdb`
    pub fgdb_file: Option<PathBuf>,
    /// INTERLIS model file (`.ili`), passed as the last token
    pub ili_model_file: Option<PathBuf>,
    /// Model repositories, only used together with `models`
    pub model_dir: Option<String>,
    pub models: Option<String>,
    pub create_basket_col: bool,
    pub create_enum_txt_col: bool,
    #[serde(flatten)]
    pub srs: SpatialReference,
    #[serde(flatten)]
    pub inheritance: InheritanceFlags,
    #[serde(default = "default_true")]
    pub create_enum_tabs: bool,
    #[serde(default = "default_true")]
    pub beautify_enum_disp_name: bool,
    #[serde(default = "default_true")]
    pub sql_enable_null: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for SchemaImportRequest {
    fn default() -> Self {
        Self {
            fgdb_file: None,
            ili_model_file: None,
            model_dir: None,
            models: None,
            create_basket_col: false,
            create_enum_txt_col: false,
            srs: SpatialReference {
                default_srs_auth: "EPSG".to_string(),
                ..SpatialReference::default()
            },
            inheritance: InheritanceFlags::default(),
            create_enum_tabs: true,
            beautify_enum_disp_name: true,
            sql_enable_null: true,
            log_file: None,
        }
    }
}

impl SchemaImportRequest {
    /// Schema import from a model file
    pub fn from_model_file(fgdb_file: impl Into<PathBuf>, ili_model_file: impl Into<PathBuf>) -> Self {
        Self {
            fgdb_file: Some(fgdb_file.into()),
            ili_model_file: Some(ili_model_file.into()),
            ..Self::default()
        }
    }

    /// Schema import of named models looked up in model repositories
    pub fn from_models(
        fgdb_file: impl Into<PathBuf>,
        model_dir: impl Into<String>,
        models: impl Into<String>,
    ) -> Self {
        Self {
            fgdb_file: Some(fgdb_file.into()),
            model_dir: Some(model_dir.into()),
            models: Some(models.into()),
            ..Self::default()
        }
    }
}

/// Fill a geodatabase with the content of a transfer file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRequest {
    pub fgdb_file: Option<PathBuf>,
    pub transfer_file: Option<PathBuf>,
    pub model_dir: Option<String>,
    pub models: Option<String>,
    pub dataset: Option<String>,
    pub delete_data: bool,
    pub topics: Option<String>,
    pub create_enum_txt_col: bool,
    pub create_basket_col: bool,
    pub import_tid: bool,
    #[serde(flatten)]
    pub srs: SpatialReference,
    pub disable_validation: bool,
    pub disable_area_validation: bool,
    #[serde(flatten)]
    pub inheritance: InheritanceFlags,
    #[serde(default = "default_true")]
    pub create_enum_tabs: bool,
    #[serde(default = "default_true")]
    pub beautify_enum_disp_name: bool,
    #[serde(default = "default_true")]
    pub sql_enable_null: bool,
    pub replace: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for ImportRequest {
    fn default() -> Self {
        Self {
            fgdb_file: None,
            transfer_file: None,
            model_dir: None,
            models: None,
            dataset: None,
            delete_data: false,
            topics: None,
            create_enum_txt_col: false,
            create_basket_col: false,
            import_tid: false,
            srs: SpatialReference::default(),
            disable_validation: false,
            disable_area_validation: false,
            inheritance: InheritanceFlags::default(),
            create_enum_tabs: true,
            beautify_enum_disp_name: true,
            sql_enable_null: true,
            replace: false,
            log_file: None,
        }
    }
}

impl ImportRequest {
    pub fn new(fgdb_file: impl Into<PathBuf>, transfer_file: impl Into<PathBuf>) -> Self {
        Self {
            fgdb_file: Some(fgdb_file.into()),
            transfer_file: Some(transfer_file.into()),
            ..Self::default()
        }
    }
}

/// Write the content of a geodatabase to a transfer file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub fgdb_file: Option<PathBuf>,
    /// Transfer file to write; ili2fgdb is started without it when unset
    pub transfer_file: Option<PathBuf>,
    pub models: Option<String>,
    pub model_dir: Option<String>,
    pub baskets: Option<String>,
    pub topics: Option<String>,
    pub disable_validation: bool,
    pub disable_area_validation: bool,
    #[serde(default = "default_true")]
    pub sql_enable_null: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            fgdb_file: None,
            transfer_file: None,
            models: None,
            model_dir: None,
            baskets: None,
            topics: None,
            disable_validation: false,
            disable_area_validation: false,
            sql_enable_null: true,
            log_file: None,
        }
    }
}

impl ExportRequest {
    pub fn new(
        fgdb_file: impl Into<PathBuf>,
        models: impl Into<String>,
        transfer_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fgdb_file: Some(fgdb_file.into()),
            models: Some(models.into()),
            transfer_file: Some(transfer_file.into()),
            ..Self::default()
        }
    }
}

/// Update the content of a geodatabase from a transfer file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub fgdb_file: Option<PathBuf>,
    pub transfer_file: Option<PathBuf>,
    pub model_dir: Option<String>,
    pub models: Option<String>,
    pub dataset: Option<String>,
    pub delete_data: bool,
    pub topics: Option<String>,
    pub create_enum_txt_col: bool,
    pub create_basket_col: bool,
    pub import_tid: bool,
    #[serde(flatten)]
    pub srs: SpatialReference,
    pub disable_validation: bool,
    /// Also switches on `--sqlEnableNull` for updates
    pub disable_area_validation: bool,
    /// Accepted for symmetry with import; ili2fgdb receives
    /// `--sqlEnableNull` only together with `disable_area_validation`
    #[serde(default = "default_true")]
    pub sql_enable_null: bool,
    #[serde(flatten)]
    pub inheritance: InheritanceFlags,
    pub log_file: Option<PathBuf>,
}

impl Default for UpdateRequest {
    fn default() -> Self {
        Self {
            fgdb_file: None,
            transfer_file: None,
            model_dir: None,
            models: None,
            dataset: None,
            delete_data: false,
            topics: None,
            create_enum_txt_col: false,
            create_basket_col: false,
            import_tid: false,
            srs: SpatialReference::default(),
            disable_validation: false,
            disable_area_validation: false,
            sql_enable_null: true,
            inheritance: InheritanceFlags::default(),
            log_file: None,
        }
    }
}

impl UpdateRequest {
    pub fn new(fgdb_file: impl Into<PathBuf>, transfer_file: impl Into<PathBuf>) -> Self {
        Self {
            fgdb_file: Some(fgdb_file.into()),
            transfer_file: Some(transfer_file.into()),
            ..Self::default()
        }
    }
}

/// Any of the four requests, tagged by `operation` in JSON
///
/// `{"operation": "import", "fgdb_file": "...", "transfer_file": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum OperationRequest {
    SchemaImport(SchemaImportRequest),
    Import(ImportRequest),
    Export(ExportRequest),
    Update(UpdateRequest),
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::SchemaImport(_) => OperationKind::SchemaImport,
            OperationRequest::Import(_) => OperationKind::Import,
            OperationRequest::Export(_) => OperationKind::Export,
            OperationRequest::Update(_) => OperationKind::Update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = SchemaImportRequest::default();
        assert_eq!(schema.srs.default_srs_auth, "EPSG");
        assert_eq!(schema.srs.default_srs_code, 2056);
        assert!(schema.create_enum_tabs && schema.beautify_enum_disp_name && schema.sql_enable_null);

        let import = ImportRequest::default();
        assert_eq!(import.srs.default_srs_auth, "epsg");
        assert_eq!(import.srs.fgdb_xy_resolution, 0.0001);
        assert_eq!(import.srs.fgdb_xy_tolerance, 0.001);
        assert!(!import.replace && !import.delete_data);
    }

    #[test]
    fn test_deserialize_flat_parameters() {
        let request: ImportRequest = serde_json::from_str(
            r#"{
                "fgdb_file": "out/test.gdb",
                "transfer_file": "data/x.xtf",
                "default_srs_code": 21781,
                "smart1_inheritance": true,
                "create_enum_tabs": false
            }"#,
        )
        .unwrap();

        assert_eq!(request.fgdb_file, Some(PathBuf::from("out/test.gdb")));
        assert_eq!(request.srs.default_srs_code, 21781);
        assert_eq!(request.srs.default_srs_auth, "epsg");
        assert!(request.inheritance.smart1_inheritance);
        assert!(!request.create_enum_tabs);
        assert!(request.beautify_enum_disp_name);
        assert!(request.sql_enable_null);
    }

    #[test]
    fn test_tagged_operation_request() {
        let request: OperationRequest = serde_json::from_str(
            r#"{"operation": "schema-import", "fgdb_file": "new.gdb", "ili_model_file": "Model.ili"}"#,
        )
        .unwrap();
        assert_eq!(request.kind(), OperationKind::SchemaImport);
        let OperationRequest::SchemaImport(schema) = request else {
            panic!("expected schema import");
        };
        assert_eq!(schema.ili_model_file, Some(PathBuf::from("Model.ili")));
        assert!(schema.sql_enable_null);

        let err = serde_json::from_str::<OperationRequest>(r#"{"operation": "delete"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_operation_kind_names() {
        assert_eq!(OperationKind::SchemaImport.to_string(), "schema-import");
        assert_eq!(OperationKind::SchemaImport.as_flag(), "--schemaimport");
        assert_eq!(OperationKind::Update.as_flag(), "--update");
    }
}
