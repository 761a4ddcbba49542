//! Per-operation argument assembly and request validation

use super::requests::{
    ExportRequest, ImportRequest, OperationKind, OperationRequest, SchemaImportRequest,
    SpatialReference, UpdateRequest,
};
use super::{ArgumentList, BuildContext, GDB_EXTENSION, non_empty, path_token};
use crate::exceptions::{LauncherError, Result};
use log::{debug, warn};
use std::path::Path;

/// `[--trace] <operation>`
fn start(kind: OperationKind, ctx: &BuildContext<'_>) -> ArgumentList {
    ArgumentList::new()
        .flag_if("--trace", ctx.trace)
        .flag(kind.as_flag())
}

fn proxy(args: ArgumentList, ctx: &BuildContext<'_>) -> ArgumentList {
    args.option("--proxy", &ctx.proxy.host)
        .option("--proxyPort", ctx.proxy.port)
}

fn spatial_reference(args: ArgumentList, srs: &SpatialReference) -> ArgumentList {
    args.option("--defaultSrsAuth", srs.default_srs_auth.to_uppercase())
        .option("--defaultSrsCode", srs.default_srs_code)
        .option("--fgdbXyResolution", srs.fgdb_xy_resolution)
        .option("--fgdbXyTolerance", srs.fgdb_xy_tolerance)
}

fn required_path(path: Option<&Path>, what: &str) -> Result<String> {
    path_token(path).ok_or_else(|| LauncherError::validation(format!("{what} must be specified")))
}

fn required_text<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| LauncherError::validation(format!("{what} must be specified")))
}

/// Arguments for `--schemaimport`
///
/// Fails if the geodatabase already exists, does not end with `.gdb`, or no
/// model source (model file, or model_dir together with models) is given.
pub fn schema_import_args(
    request: &SchemaImportRequest,
    ctx: &BuildContext<'_>,
) -> Result<ArgumentList> {
    let fgdb_path = request.fgdb_file.as_deref();
    let fgdb = required_path(fgdb_path, "path of the new file geodatabase")?;
    if fgdb_path.is_some_and(Path::is_dir) {
        return Err(LauncherError::validation(format!(
            "file geodatabase {fgdb} already exists"
        )));
    }
    if !fgdb.ends_with(GDB_EXTENSION) {
        return Err(LauncherError::validation(format!(
            "file geodatabase {fgdb} does not end with \"{GDB_EXTENSION}\""
        )));
    }

    let model_file = path_token(request.ili_model_file.as_deref());
    let models = non_empty(request.models.as_deref());
    let model_dir = non_empty(request.model_dir.as_deref());
    let repository_models = models.zip(model_dir);
    if model_file.is_none() && repository_models.is_none() {
        return Err(LauncherError::validation(
            "an INTERLIS model file, or model_dir together with models, must be specified",
        ));
    }

    let inheritance = request.inheritance.resolve()?;
    let log_file = path_token(request.log_file.as_deref());

    let args = proxy(start(OperationKind::SchemaImport, ctx), ctx);
    let mut args = spatial_reference(args, &request.srs)
        .option("--dbfile", &fgdb)
        .option_if_set("--log", log_file.as_deref())
        .flag_if("--createBasketCol", request.create_basket_col)
        .flag_if("--createEnumTxtCol", request.create_enum_txt_col)
        .flag(inheritance.as_flag())
        .flag_if("--createEnumTabs", request.create_enum_tabs)
        .flag_if("--beautifyEnumDispName", request.beautify_enum_disp_name)
        .flag_if("--sqlEnableNull", request.sql_enable_null);
    if let Some((models, model_dir)) = repository_models {
        args = args.option("--models", models).option("--modeldir", model_dir);
    }
    // ili2fgdb has always been given --log twice for schema imports
    let args = args
        .option_if_set("--log", log_file.as_deref())
        .positional_if_set(model_file.as_deref());

    debug!("🧩 schema-import arguments: {args}");
    Ok(args)
}

/// Arguments for `--import`
pub fn import_args(request: &ImportRequest, ctx: &BuildContext<'_>) -> Result<ArgumentList> {
    let fgdb = required_path(request.fgdb_file.as_deref(), "path of the file geodatabase")?;
    let transfer = required_path(
        request.transfer_file.as_deref(),
        "path of the INTERLIS transfer file",
    )?;
    let inheritance = request.inheritance.resolve()?;
    let log_file = path_token(request.log_file.as_deref());

    let args = start(OperationKind::Import, ctx)
        .option("--dbfile", &fgdb)
        .option_if_set("--models", request.models.as_deref());
    let args = spatial_reference(proxy(args, ctx), &request.srs)
        .option_if_set("--modeldir", request.model_dir.as_deref())
        .option_if_set("--dataset", request.dataset.as_deref())
        .flag_if("--disableValidation", request.disable_validation)
        .flag_if("--disableAreaValidation", request.disable_area_validation)
        .flag_if("--deleteData", request.delete_data)
        .option_if_set("--topics", request.topics.as_deref())
        .flag_if("--importTid", request.import_tid)
        .flag_if("--createBasketCol", request.create_basket_col)
        .flag_if("--createEnumTxtCol", request.create_enum_txt_col)
        .flag(inheritance.as_flag())
        .flag_if("--createEnumTabs", request.create_enum_tabs)
        .flag_if("--beautifyEnumDispName", request.beautify_enum_disp_name)
        .flag_if("--sqlEnableNull", request.sql_enable_null)
        .flag_if("--replace", request.replace)
        .option_if_set("--log", log_file.as_deref())
        .positional(transfer);

    debug!("🧩 import arguments: {args}");
    Ok(args)
}

/// Arguments for `--export`
///
/// The transfer file is optional here; ili2fgdb itself reports the problem
/// when it is missing.
pub fn export_args(request: &ExportRequest, ctx: &BuildContext<'_>) -> Result<ArgumentList> {
    let fgdb = required_path(request.fgdb_file.as_deref(), "path of the file geodatabase")?;
    let models = required_text(request.models.as_deref(), "models to export")?;
    let transfer = path_token(request.transfer_file.as_deref());
    if transfer.is_none() {
        warn!("⚠️ export without transfer file, ili2fgdb will be started without one");
    }
    let log_file = path_token(request.log_file.as_deref());

    let args = start(OperationKind::Export, ctx)
        .option_if_set("--topics", request.topics.as_deref())
        .option_if_set("--baskets", request.baskets.as_deref())
        .option("--dbfile", &fgdb)
        .option("--models", models);
    let args = proxy(args, ctx)
        .option_if_set("--modeldir", request.model_dir.as_deref())
        .flag_if("--sqlEnableNull", request.sql_enable_null)
        .flag_if("--disableValidation", request.disable_validation)
        .flag_if("--disableAreaValidation", request.disable_area_validation)
        .option_if_set("--log", log_file.as_deref())
        .positional_if_set(transfer.as_deref());

    debug!("🧩 export arguments: {args}");
    Ok(args)
}

/// Arguments for `--update`
///
/// `--sqlEnableNull` is emitted together with `--disableAreaValidation`,
/// independent of `sql_enable_null`.
pub fn update_args(request: &UpdateRequest, ctx: &BuildContext<'_>) -> Result<ArgumentList> {
    let fgdb = required_path(request.fgdb_file.as_deref(), "path of the file geodatabase")?;
    let transfer = required_path(
        request.transfer_file.as_deref(),
        "path of the INTERLIS transfer file",
    )?;
    let inheritance = request.inheritance.resolve()?;
    let log_file = path_token(request.log_file.as_deref());

    let args = proxy(start(OperationKind::Update, ctx), ctx);
    let args = spatial_reference(args, &request.srs)
        .option_if_set("--dataset", request.dataset.as_deref())
        .flag_if("--disableValidation", request.disable_validation)
        .flag_if("--disableAreaValidation", request.disable_area_validation)
        .flag_if("--sqlEnableNull", request.disable_area_validation)
        .flag(inheritance.as_flag())
        .flag_if("--deleteData", request.delete_data)
        .option_if_set("--topics", request.topics.as_deref())
        .flag_if("--importTid", request.import_tid)
        .flag_if("--createBasketCol", request.create_basket_col)
        .flag_if("--createEnumTxtCol", request.create_enum_txt_col)
        .option_if_set("--models", request.models.as_deref())
        .option_if_set("--modeldir", request.model_dir.as_deref())
        .option_if_set("--log", log_file.as_deref())
        .option("--dbfile", &fgdb)
        .positional(transfer);

    debug!("🧩 update arguments: {args}");
    Ok(args)
}

impl OperationRequest {
    /// Dispatch to the builder matching the operation
    pub fn arguments(&self, ctx: &BuildContext<'_>) -> Result<ArgumentList> {
        match self {
            OperationRequest::SchemaImport(request) => schema_import_args(request, ctx),
            OperationRequest::Import(request) => import_args(request, ctx),
            OperationRequest::Export(request) => export_args(request, ctx),
            OperationRequest::Update(request) => update_args(request, ctx),
        }
    }
}
