/// Drive the student + parent registration form from the command line.
///
/// Usage:
///   register-student classes
///   register-student lookup 12345-6789012-3
///   register-student register --file draft.json
///   register-student update --id <STUDENT_ID> --file draft.json
///   register-student students --page 2
///
/// Draft files hold `{ "student": {...}, "parent": {...} }` using the same
/// camelCase field names as the API. API_BASE_URL selects the server.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_admin::{
    config::Config,
    context::{PanelContext, UserType},
    models::{parent::ParentDraft, student::StudentDraft},
    pagination::Paginator,
    services::{
        api::ApiClient,
        classes::ClassService,
        lookup::{LookupClient, LookupResult},
        students::StudentDirectory,
        submission::SubmissionCoordinator,
        workflow::{RegistrationWorkflow, WorkflowState},
    },
};

#[derive(Parser)]
#[command(name = "register-student", about = "Register students together with their parent")]
struct Args {
    /// Registration type, as picked in the admin panel
    #[arg(long, default_value = "student")]
    user_type: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the classes a student can be placed in
    Classes,
    /// Look up a parent by CNIC
    Lookup { cnic: String },
    /// Register a new student and link or create the parent
    Register {
        #[arg(long)]
        file: PathBuf,
        /// Do not search for the parent before submitting
        #[arg(long)]
        no_lookup: bool,
    },
    /// Update an existing student and its parent
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// List registered students
    Students {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Deserialize)]
struct DraftFile {
    #[serde(default)]
    student: StudentDraft,
    #[serde(default)]
    parent: ParentDraft,
}

fn read_drafts(path: &Path) -> anyhow::Result<DraftFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft file {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid draft file {:?}", path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let api = ApiClient::new(&config)?;

    let mut ctx = PanelContext::new();
    ctx.select_user_type(args.user_type.parse::<UserType>()?);

    match args.command {
        Command::Classes => {
            for class in ClassService::new(api).list_or_fallback().await {
                println!("{}\t{}", class.id, class.name);
            }
        }
        Command::Lookup { cnic } => match LookupClient::new(api).lookup(&cnic).await {
            LookupResult::Found(parent) => println!("{}", serde_json::to_string_pretty(&parent)?),
            LookupResult::NotFound => println!("No parent registered with CNIC {cnic}"),
            LookupResult::Error(e) => anyhow::bail!("Lookup failed: {e}"),
        },
        Command::Register { file, no_lookup } => {
            let drafts = read_drafts(&file)?;
            let mut workflow = ctx.student_registration()?;
            workflow.mount(&ClassService::new(api.clone())).await;

            workflow.edit_parent(|p| *p = drafts.parent)?;
            if !no_lookup && workflow.can_search() {
                workflow.search(&LookupClient::new(api.clone())).await?;
                if let Some(notice) = workflow.notice() {
                    println!("{}", notice.text);
                }
            }
            workflow.edit_student(|s| *s = drafts.student)?;

            finish(workflow, &SubmissionCoordinator::new(api)).await?;
        }
        Command::Update { id, file } => {
            // Confirms the panel is on the student form before editing.
            ctx.student_registration()?;
            let drafts = read_drafts(&file)?;
            let mut workflow = RegistrationWorkflow::for_update(id, drafts.student, drafts.parent);
            workflow.mount(&ClassService::new(api.clone())).await;

            finish(workflow, &SubmissionCoordinator::new(api)).await?;
        }
        Command::Students { page } => {
            let listing = StudentDirectory::new(api).page(page).await?;
            for student in &listing.students {
                println!(
                    "{}\t{}\t{}\tclass {}\tparent {}",
                    student.id, student.username, student.full_name, student.class_id, student.father_id
                );
            }

            let pager = Paginator::new(listing.total, listing.per_page, config.max_visible_pages)
                .at_page(listing.page);
            let pages: Vec<String> = pager
                .visible_pages()
                .iter()
                .map(|p| {
                    if *p == pager.current_page() {
                        format!("[{p}]")
                    } else {
                        p.to_string()
                    }
                })
                .collect();
            println!("{} students, pages: {}", listing.total, pages.join(" "));
        }
    }

    Ok(())
}

async fn finish(
    mut workflow: RegistrationWorkflow,
    coordinator: &SubmissionCoordinator,
) -> anyhow::Result<()> {
    if !workflow.classes().is_empty()
        && !workflow.student().class_id.is_empty()
        && !workflow
            .classes()
            .iter()
            .any(|c| c.id == workflow.student().class_id)
    {
        tracing::warn!("Class {} is not in the class list", workflow.student().class_id);
    }

    match workflow.submit(coordinator).await? {
        WorkflowState::Submitted => {
            println!(
                "Saved {} (parent {})",
                workflow.student().full_name,
                workflow.student().father()
            );
            Ok(())
        }
        _ => {
            let reason = workflow
                .notice()
                .map(|n| n.text.clone())
                .unwrap_or_else(|| "Submission failed".into());
            anyhow::bail!(reason)
        }
    }
}
