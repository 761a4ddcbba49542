//! ili2fgdb launcher binary

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ili2fgdb::exit_codes::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS};
use ili2fgdb::{
    ExportRequest, ImportRequest, InheritanceFlags, LaunchOptions, LauncherError,
    OperationRequest, ProxyConfig, RuntimeConfig, SchemaImportRequest, SpatialReference,
    UpdateRequest,
};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = ili2fgdb::version::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "ili2fgdb-launcher",
    version = VERSION,
    about = "Run ili2fgdb from its bundled archive"
)]
struct Cli {
    /// ili2fgdb archive (defaults to ili2fgdb-<version>.zip, then .tar.gz, next to this binary)
    #[arg(long, global = true)]
    archive: Option<PathBuf>,

    /// Java runtime (defaults to ILI2FGDB_JAVA, the platform default or java on PATH)
    #[arg(long, global = true)]
    java: Option<PathBuf>,

    /// Pass --trace to ili2fgdb
    #[arg(long, global = true)]
    trace: bool,

    /// Log level (trace, debug, info, warn, error, json:<level>)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new geodatabase from an INTERLIS model
    SchemaImport(SchemaImportArgs),
    /// Import a transfer file into a geodatabase
    Import(ImportArgs),
    /// Export a geodatabase to a transfer file
    Export(ExportArgs),
    /// Update a geodatabase from a transfer file
    Update(UpdateArgs),
    /// Run a request read from a JSON file
    Run {
        /// JSON file with an `operation` field
        #[arg(long)]
        request: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SrsArgs {
    #[arg(long)]
    default_srs_auth: Option<String>,
    #[arg(long)]
    default_srs_code: Option<u32>,
    #[arg(long)]
    fgdb_xy_resolution: Option<f64>,
    #[arg(long)]
    fgdb_xy_tolerance: Option<f64>,
}

impl SrsArgs {
    fn apply(self, srs: &mut SpatialReference) {
        if let Some(auth) = self.default_srs_auth {
            srs.default_srs_auth = auth;
        }
        if let Some(code) = self.default_srs_code {
            srs.default_srs_code = code;
        }
        if let Some(resolution) = self.fgdb_xy_resolution {
            srs.fgdb_xy_resolution = resolution;
        }
        if let Some(tolerance) = self.fgdb_xy_tolerance {
            srs.fgdb_xy_tolerance = tolerance;
        }
    }
}

#[derive(Args, Debug)]
struct InheritanceArgs {
    #[arg(long)]
    smart2_inheritance: bool,
    #[arg(long)]
    smart1_inheritance: bool,
    #[arg(long)]
    no_smart_mapping: bool,
}

impl From<InheritanceArgs> for InheritanceFlags {
    fn from(args: InheritanceArgs) -> Self {
        InheritanceFlags {
            smart2_inheritance: args.smart2_inheritance,
            smart1_inheritance: args.smart1_inheritance,
            no_smart_mapping: args.no_smart_mapping,
        }
    }
}

#[derive(Args, Debug)]
struct SchemaImportArgs {
    /// Geodatabase to create, must end with .gdb
    #[arg(long)]
    fgdb_file: PathBuf,
    /// INTERLIS model file
    #[arg(long)]
    ili_model_file: Option<PathBuf>,
    #[arg(long)]
    model_dir: Option<String>,
    #[arg(long)]
    models: Option<String>,
    #[arg(long)]
    create_basket_col: bool,
    #[arg(long)]
    create_enum_txt_col: bool,
    #[arg(long)]
    no_create_enum_tabs: bool,
    #[arg(long)]
    no_beautify_enum_disp_name: bool,
    #[arg(long)]
    no_sql_enable_null: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    srs: SrsArgs,
    #[command(flatten)]
    inheritance: InheritanceArgs,
}

impl From<SchemaImportArgs> for SchemaImportRequest {
    fn from(args: SchemaImportArgs) -> Self {
        let mut request = SchemaImportRequest {
            fgdb_file: Some(args.fgdb_file),
            ili_model_file: args.ili_model_file,
            model_dir: args.model_dir,
            models: args.models,
            create_basket_col: args.create_basket_col,
            create_enum_txt_col: args.create_enum_txt_col,
            inheritance: args.inheritance.into(),
            create_enum_tabs: !args.no_create_enum_tabs,
            beautify_enum_disp_name: !args.no_beautify_enum_disp_name,
            sql_enable_null: !args.no_sql_enable_null,
            log_file: args.log_file,
            ..SchemaImportRequest::default()
        };
        args.srs.apply(&mut request.srs);
        request
    }
}

#[derive(Args, Debug)]
struct ImportArgs {
    #[arg(long)]
    fgdb_file: PathBuf,
    /// INTERLIS transfer file to import
    #[arg(long)]
    transfer_file: PathBuf,
    #[arg(long)]
    model_dir: Option<String>,
    #[arg(long)]
    models: Option<String>,
    #[arg(long)]
    dataset: Option<String>,
    #[arg(long)]
    delete_data: bool,
    #[arg(long)]
    topics: Option<String>,
    #[arg(long)]
    create_enum_txt_col: bool,
    #[arg(long)]
    create_basket_col: bool,
    #[arg(long)]
    import_tid: bool,
    #[arg(long)]
    disable_validation: bool,
    #[arg(long)]
    disable_area_validation: bool,
    #[arg(long)]
    no_create_enum_tabs: bool,
    #[arg(long)]
    no_beautify_enum_disp_name: bool,
    #[arg(long)]
    no_sql_enable_null: bool,
    #[arg(long)]
    replace: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    srs: SrsArgs,
    #[command(flatten)]
    inheritance: InheritanceArgs,
}

impl From<ImportArgs> for ImportRequest {
    fn from(args: ImportArgs) -> Self {
        let mut request = ImportRequest {
            fgdb_file: Some(args.fgdb_file),
            transfer_file: Some(args.transfer_file),
            model_dir: args.model_dir,
            models: args.models,
            dataset: args.dataset,
            delete_data: args.delete_data,
            topics: args.topics,
            create_enum_txt_col: args.create_enum_txt_col,
            create_basket_col: args.create_basket_col,
            import_tid: args.import_tid,
            disable_validation: args.disable_validation,
            disable_area_validation: args.disable_area_validation,
            inheritance: args.inheritance.into(),
            create_enum_tabs: !args.no_create_enum_tabs,
            beautify_enum_disp_name: !args.no_beautify_enum_disp_name,
            sql_enable_null: !args.no_sql_enable_null,
            replace: args.replace,
            log_file: args.log_file,
            ..ImportRequest::default()
        };
        args.srs.apply(&mut request.srs);
        request
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    fgdb_file: PathBuf,
    /// Models to export
    #[arg(long)]
    models: String,
    /// INTERLIS transfer file to write
    #[arg(long)]
    transfer_file: Option<PathBuf>,
    #[arg(long)]
    model_dir: Option<String>,
    #[arg(long)]
    baskets: Option<String>,
    #[arg(long)]
    topics: Option<String>,
    #[arg(long)]
    disable_validation: bool,
    #[arg(long)]
    disable_area_validation: bool,
    #[arg(long)]
    no_sql_enable_null: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<ExportArgs> for ExportRequest {
    fn from(args: ExportArgs) -> Self {
        ExportRequest {
            fgdb_file: Some(args.fgdb_file),
            transfer_file: args.transfer_file,
            models: Some(args.models),
            model_dir: args.model_dir,
            baskets: args.baskets,
            topics: args.topics,
            disable_validation: args.disable_validation,
            disable_area_validation: args.disable_area_validation,
            sql_enable_null: !args.no_sql_enable_null,
            log_file: args.log_file,
        }
    }
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    fgdb_file: PathBuf,
    /// INTERLIS transfer file with the new content
    #[arg(long)]
    transfer_file: PathBuf,
    #[arg(long)]
    model_dir: Option<String>,
    #[arg(long)]
    models: Option<String>,
    #[arg(long)]
    dataset: Option<String>,
    #[arg(long)]
    delete_data: bool,
    #[arg(long)]
    topics: Option<String>,
    #[arg(long)]
    create_enum_txt_col: bool,
    #[arg(long)]
    create_basket_col: bool,
    #[arg(long)]
    import_tid: bool,
    #[arg(long)]
    disable_validation: bool,
    /// Also passes --sqlEnableNull
    #[arg(long)]
    disable_area_validation: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    srs: SrsArgs,
    #[command(flatten)]
    inheritance: InheritanceArgs,
}

impl From<UpdateArgs> for UpdateRequest {
    fn from(args: UpdateArgs) -> Self {
        let mut request = UpdateRequest {
            fgdb_file: Some(args.fgdb_file),
            transfer_file: Some(args.transfer_file),
            model_dir: args.model_dir,
            models: args.models,
            dataset: args.dataset,
            delete_data: args.delete_data,
            topics: args.topics,
            create_enum_txt_col: args.create_enum_txt_col,
            create_basket_col: args.create_basket_col,
            import_tid: args.import_tid,
            disable_validation: args.disable_validation,
            disable_area_validation: args.disable_area_validation,
            inheritance: args.inheritance.into(),
            log_file: args.log_file,
            ..UpdateRequest::default()
        };
        args.srs.apply(&mut request.srs);
        request
    }
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {panic_info}");
        ili2fgdb::cleanup_registered();
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    // Staging directories of a launcher still alive at exit
    ili2fgdb::cleanup_registered();

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in launcher");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("ili2fgdb-launcher {}", ili2fgdb::version::full_version());
        return EXIT_SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                EXIT_INVALID_ARGS
            } else {
                EXIT_SUCCESS
            };
        }
    };

    let level = match cli.log_level {
        Some(ref level) => ili2fgdb::logger::JsonLogger::init_with_level(level),
        None => ili2fgdb::logger::JsonLogger::init(),
    };
    log::debug!("🚀 ili2fgdb-launcher {VERSION} started (log level {level})");

    install_signal_cleanup();

    match execute(cli) {
        Ok(output) => {
            print!("{output}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.downcast_ref::<LauncherError>()
                .map_or(EXIT_ERROR, LauncherError::exit_code)
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<String> {
    let config = match cli.java {
        Some(java) => RuntimeConfig::new(java, ProxyConfig::from_env()?),
        None => RuntimeConfig::discover()?,
    };
    let options = LaunchOptions {
        archive: cli.archive,
        trace: cli.trace.then_some(true),
    };

    let request = match cli.command {
        Command::SchemaImport(args) => OperationRequest::SchemaImport(args.into()),
        Command::Import(args) => OperationRequest::Import(args.into()),
        Command::Export(args) => OperationRequest::Export(args.into()),
        Command::Update(args) => OperationRequest::Update(args.into()),
        Command::Run { request } => ili2fgdb::load_request(&request)
            .with_context(|| format!("Failed to read request {}", request.display()))?,
    };

    let kind = request.kind();
    let output = ili2fgdb::run_request(config, options, &request)
        .with_context(|| format!("ili2fgdb {kind} failed"))?;
    Ok(output)
}

/// Remove staging directories when interrupted
#[cfg(unix)]
fn install_signal_cleanup() {
    use ili2fgdb::exit_codes::EXIT_INTERRUPTED;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(signals) => signals,
        Err(e) => {
            log::warn!("⚠️ Could not install signal handler: {e}");
            return;
        }
    };
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::warn!("⚠️ Received signal {signal}, removing staging directories");
            ili2fgdb::cleanup_registered();
            process::exit(EXIT_INTERRUPTED);
        }
    });
}

#[cfg(not(unix))]
fn install_signal_cleanup() {}
