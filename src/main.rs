use clap::Parser;

use git_autocommit::workflow::{self, WorkflowArgs, WorkflowOutcome};
use git_autocommit::{config, git_ops::GitRepo, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-autocommit",
    about = "Commit, version and push from a single conventional-commit description"
)]
struct Args {
    #[arg(help = "Commit description, e.g. \"feat(auth): add login - supports oauth\"")]
    description: Option<String>,

    #[arg(short, long, help = "Stage all changes before committing")]
    add: bool,

    #[arg(short = 'b', long = "major", help = "Force a major version bump")]
    major: bool,

    #[arg(
        short = 'w',
        long = "write-version",
        help = "Update the configured version file before committing"
    )]
    write_version: bool,

    #[arg(
        short = 't',
        long,
        help = "Create and push an annotated tag when a version bump was decided"
    )]
    tag: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short = 'v', long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("git-autocommit {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            return 1;
        }
    };

    let description = match args.description {
        Some(d) if !d.trim().is_empty() => d,
        _ => {
            ui::display_error("No commit description was provided");
            ui::display_usage_example();
            return 1;
        }
    };

    let repo = match GitRepo::open() {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&e.to_string());
            return 1;
        }
    };

    let workflow_args = WorkflowArgs {
        description,
        stage_all: args.add,
        force_major: args.major,
        write_version: args.write_version,
        create_tag: args.tag,
    };

    match workflow::run(&repo, &workflow_args, &config, ui::confirm_action) {
        Ok(WorkflowOutcome::Committed { title, tag }) => {
            match tag {
                Some(tag) => println!(
                    "\n\x1b[32m✓\x1b[0m Successfully committed '{}' and published tag {}\n",
                    title, tag
                ),
                None => println!("\n\x1b[32m✓\x1b[0m Successfully committed '{}'\n", title),
            }
            0
        }
        Ok(WorkflowOutcome::NothingToCommit) | Ok(WorkflowOutcome::Cancelled) => 0,
        Err(e) => {
            ui::display_error(&e.to_string());
            if e.is_validation() {
                ui::display_usage_example();
            }
            1
        }
    }
}
