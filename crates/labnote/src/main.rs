use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use labnote::cli::commands;
use labnote::config::open_store;
use labnote::report::{ReportUpdate, Stage};

#[derive(Parser)]
#[command(name = "labnote")]
#[command(about = "labnote - Research notes\nSave, inspect and print research note snapshots")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Cli {
  /// Snapshot directory (defaults to ~/.labnote/snapshots)
  #[arg(long, global = true, env = "LABNOTE_SNAPSHOT_ROOT")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// Report fields, one flag each
#[derive(Args)]
struct NoteFields {
  #[arg(long)]
  author: Option<String>,
  #[arg(long)]
  reviewer: Option<String>,
  /// Authored date (YYYY-MM-DD)
  #[arg(long)]
  date: Option<String>,
  /// Planning, E/S, Pilot or Approved/Transferred
  #[arg(long)]
  stage: Option<Stage>,
  #[arg(long)]
  title: Option<String>,
  #[arg(long)]
  goal: Option<String>,
  #[arg(long)]
  materials: Option<String>,
  #[arg(long)]
  test_method: Option<String>,
  #[arg(long)]
  issues: Option<String>,
  #[arg(long)]
  resolution: Option<String>,
  #[arg(long)]
  future: Option<String>,
}

impl From<NoteFields> for ReportUpdate {
  fn from(fields: NoteFields) -> Self {
    ReportUpdate {
      author_name: fields.author,
      reviewer_name: fields.reviewer,
      authored_date: fields.date,
      stage: fields.stage,
      title: fields.title,
      goal: fields.goal,
      materials: fields.materials,
      test_method: fields.test_method,
      key_issues: fields.issues,
      resolution_plan: fields.resolution,
      future_plan: fields.future,
    }
  }
}

#[derive(Subcommand)]
enum Command {
  /// Save a new snapshot from field values
  Save {
    /// Snapshot name (the title is used when empty)
    name: String,
    #[command(flatten)]
    fields: NoteFields,
    /// Image files to attach (png, jpg, jpeg, gif, bmp)
    #[arg(long = "attach")]
    attachments: Vec<PathBuf>,
  },
  /// List snapshots, newest first
  List,
  /// Show every field of a snapshot
  Show {
    /// Snapshot id as printed by `list`
    id: String,
  },
  /// Delete a snapshot
  Delete {
    id: String,
  },
  /// Write the printable HTML report for a snapshot
  Print {
    id: String,
    /// Output file (defaults to research_note_<timestamp>.html)
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

fn handle(cli: Cli) -> Result<()> {
  let store = open_store(cli.root.as_deref())?;

  match cli.command {
    Command::Save { name, fields, attachments } => {
      commands::save_note(&store, &name, fields.into(), &attachments)
    }
    Command::List => commands::list_notes(&store),
    Command::Show { id } => commands::show_note(&store, &id),
    Command::Delete { id } => commands::delete_note(&store, &id),
    Command::Print { id, output } => commands::print_note(&store, &id, output.as_deref()),
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  handle(cli)
}
