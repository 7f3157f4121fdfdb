//! Command-line host for the assessment instance table.
//!
//! Renders a step's instance table from an assessment document and issues the
//! table's commands against the same document.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use instance_table::exit_codes;
use instance_table::instance::{InstancesMap, ManualTestStatus};
use instance_table::io::config::load_config;
use instance_table::io::instance_store::{AssessmentStore, init_document};
use instance_table::logging;
use instance_table::render::RenderOutcome;
use instance_table::step::{TestStep, TestType};
use instance_table::steps::StepRegistry;
use instance_table::view::{InstanceTableViewModel, TableView, ViewModel};

#[derive(Parser)]
#[command(
    name = "instance-table",
    version,
    about = "Render and act on assessment instance tables"
)]
struct Cli {
    /// Table configuration (TOML). Defaults apply if the file is missing.
    #[arg(long, global = true, default_value = ".instance-table/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct StepArgs {
    /// Assessment document (JSON).
    #[arg(long)]
    doc: PathBuf,
    /// Test type, e.g. `headings`.
    #[arg(long)]
    test: TestType,
    /// Step name, e.g. `headingFunction`.
    #[arg(long)]
    step: String,
}

#[derive(Subcommand)]
enum Command {
    /// List registered test steps.
    Steps,
    /// Create an empty assessment document if missing.
    Init {
        #[arg(long)]
        doc: PathBuf,
        /// Overwrite an existing document.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the instance table for a step.
    Render(StepArgs),
    /// Toggle one instance's visualization.
    Toggle {
        #[command(flatten)]
        step: StepArgs,
        #[arg(long)]
        key: String,
    },
    /// Toggle every visualization of the step (enables all unless all are enabled).
    ToggleAll(StepArgs),
    /// Mark every unmarked instance of the step as passed.
    PassUnmarked(StepArgs),
    /// Set the manual status of one instance.
    SetStatus {
        #[command(flatten)]
        step: StepArgs,
        #[arg(long)]
        key: String,
        /// `unknown`, `pass`, or `fail`.
        #[arg(long)]
        status: ManualTestStatus,
    },
    /// Replace (or clear) the failure summary of a captured instance.
    EditFailure {
        #[command(flatten)]
        step: StepArgs,
        #[arg(long)]
        key: String,
        /// New summary; omit to clear it.
        #[arg(long)]
        summary: Option<String>,
    },
    /// Remove an instance captured by the reviewer.
    RemoveCaptured {
        #[command(flatten)]
        step: StepArgs,
        #[arg(long)]
        key: String,
    },
    /// Focus the target of one instance.
    Focus {
        #[command(flatten)]
        step: StepArgs,
        #[arg(long)]
        key: String,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).context("load table config")?;
    let registry = StepRegistry::builtin().context("register built-in steps")?;

    let args = match &cli.command {
        Command::Steps => {
            for step in registry.iter() {
                let helper = if step.has_visual_helper() {
                    " (visual helper)"
                } else {
                    ""
                };
                println!("{}/{}{}", step.test_type(), step.name(), helper);
            }
            return Ok(exit_codes::OK);
        }
        Command::Init { doc, force } => {
            if init_document(doc, *force)? {
                println!("wrote {}", doc.display());
            }
            return Ok(exit_codes::OK);
        }
        Command::Render(args)
        | Command::Toggle { step: args, .. }
        | Command::ToggleAll(args)
        | Command::PassUnmarked(args)
        | Command::SetStatus { step: args, .. }
        | Command::EditFailure { step: args, .. }
        | Command::RemoveCaptured { step: args, .. }
        | Command::Focus { step: args, .. } => args,
    };

    let Some(step) = registry.get(args.test, &args.step) else {
        eprintln!("unknown step {}/{}", args.test, args.step);
        return Ok(exit_codes::UNKNOWN_STEP);
    };

    let store = AssessmentStore::new(&args.doc);
    let document = store.load()?;
    let table = InstanceTableViewModel::with_settings(&store, config.view_settings());
    debug!(test = %args.test, step = %args.step, "selected step");

    match &cli.command {
        Command::Render(_) => {
            let outcome = table.render(
                document.instances.as_ref(),
                Some(step),
                &config.message_generator(),
                &config.text_renderer(),
            );
            match outcome {
                RenderOutcome::Loading { label } => println!("{}...", label),
                RenderOutcome::Message(message) => println!("{}", message.message),
                RenderOutcome::List(text) => print!("{}", text),
            }
        }
        Command::Toggle { key, .. } => {
            let view = ready_view(&table, &document.instances, step)?;
            require_row(&view, key, args)?;
            let Some(toggle) = view.visualization_toggle(key) else {
                bail!("{}/{} has no visual helper", args.test, args.step);
            };
            table.on_toggle_visualization(&toggle)?;
        }
        Command::ToggleAll(_) => {
            let view = ready_view(&table, &document.instances, step)?;
            let Some(toggle) = view.master_toggle() else {
                bail!("{}/{} has no visual helper", args.test, args.step);
            };
            table.on_toggle_all_visualizations(&toggle.on_toggle)?;
        }
        Command::PassUnmarked(_) => {
            let view = ready_view(&table, &document.instances, step)?;
            if view.pass_unmarked_disabled() {
                println!("no unmarked instances");
                return Ok(exit_codes::OK);
            }
            table.on_pass_unmarked_instances(args.test, &args.step)?;
        }
        Command::SetStatus { key, status, .. } => {
            let view = ready_view(&table, &document.instances, step)?;
            require_row(&view, key, args)?;
            let Some(choice) = view.status_choice(key) else {
                bail!("{}/{} has no status choice", args.test, args.step);
            };
            table.on_change_instance_status(&choice.choose(*status))?;
        }
        Command::EditFailure { key, summary, .. } => {
            let view = ready_view(&table, &document.instances, step)?;
            require_row(&view, key, args)?;
            let Some(actions) = view.captured_actions(key) else {
                bail!("instance '{}' was not captured by the reviewer", key);
            };
            table.on_edit_failure_summary(&actions.edit(summary.clone()))?;
        }
        Command::RemoveCaptured { key, .. } => {
            let view = ready_view(&table, &document.instances, step)?;
            require_row(&view, key, args)?;
            let Some(actions) = view.captured_actions(key) else {
                bail!("instance '{}' was not captured by the reviewer", key);
            };
            table.on_remove_captured_instance(&actions.remove())?;
        }
        Command::Focus { key, .. } => {
            let view = ready_view(&table, &document.instances, step)?;
            require_row(&view, key, args)?;
            table.on_instance_activated(&view, key)?;
        }
        Command::Steps | Command::Init { .. } => {}
    }

    Ok(exit_codes::OK)
}

/// Build the view model, failing if instances are still loading.
fn ready_view<'a>(
    table: &InstanceTableViewModel<&AssessmentStore>,
    instances: &'a Option<InstancesMap>,
    step: &dyn TestStep,
) -> Result<ViewModel<'a>> {
    match table.build_view_model(instances.as_ref(), Some(step)) {
        TableView::Loading => bail!("instances are still loading"),
        TableView::Ready(view) => Ok(view),
    }
}

fn require_row(view: &ViewModel<'_>, key: &str, args: &StepArgs) -> Result<()> {
    if view.row(key).is_none() {
        bail!("instance '{}' has no result for {}/{}", key, args.test, args.step);
    }
    Ok(())
}
