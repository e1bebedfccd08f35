use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = "Folio: versioned wiki page storage", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub repo: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FlavorArg {
    Plain,
    Navigation,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a repository (or confirm an existing one)
    Init,
    /// List pages
    Ls(LsArgs),
    /// Print a page's source
    Cat(CatArgs),
    /// Write a page from a file or stdin
    Edit(EditArgs),
    /// Rename a page
    Mv(MvArgs),
    /// Show page or repository history
    Log(LogArgs),
    /// Show the changes made by a revision
    Diff(DiffArgs),
    /// Undo a revision's edit on top of head
    Revert(RevertArgs),
    /// Render a page to HTML
    Render(RenderArgs),
}

/// Who to record on a new revision. Defaults come from `folio.toml`.
#[derive(Args)]
pub struct AuthorArgs {
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args)]
pub struct LsArgs {
    /// Revision id (defaults to head)
    #[arg(short, long)]
    pub rev: Option<String>,
}

#[derive(Args)]
pub struct CatArgs {
    pub title: String,
    #[arg(short, long)]
    pub rev: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    pub title: String,
    #[arg(short, long)]
    pub message: String,
    /// Read the new content from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub author: AuthorArgs,
}

#[derive(Args)]
pub struct MvArgs {
    pub from: String,
    pub to: String,
    #[command(flatten)]
    pub author: AuthorArgs,
}

#[derive(Args)]
pub struct LogArgs {
    /// Only revisions that changed this page
    pub title: Option<String>,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct DiffArgs {
    pub rev: String,
}

#[derive(Args)]
pub struct RevertArgs {
    pub rev: String,
    #[command(flatten)]
    pub author: AuthorArgs,
}

#[derive(Args)]
pub struct RenderArgs {
    pub title: String,
    #[arg(short, long)]
    pub rev: Option<String>,
    #[arg(long, default_value = "plain")]
    pub flavor: FlavorArg,
    /// Render this file as the page instead of a committed revision
    #[arg(long, conflicts_with = "rev")]
    pub preview: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_with_repo() {
        let cli = Cli::try_parse_from(["folio", "-C", "/tmp/wiki", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert_eq!(cli.repo, PathBuf::from("/tmp/wiki"));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_edit() {
        let cli = Cli::try_parse_from([
            "folio", "edit", "intro", "-m", "create", "--file", "intro.rst", "--author", "Ada",
        ])
        .unwrap();
        if let Command::Edit(args) = cli.command {
            assert_eq!(args.title, "intro");
            assert_eq!(args.message, "create");
            assert_eq!(args.file, Some(PathBuf::from("intro.rst")));
            assert_eq!(args.author.author, Some("Ada".into()));
            assert_eq!(args.author.email, None);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn edit_requires_message() {
        assert!(Cli::try_parse_from(["folio", "edit", "intro"]).is_err());
    }

    #[test]
    fn parse_log_json() {
        let cli = Cli::try_parse_from(["folio", "log", "intro", "-n", "5", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Log(args) = cli.command {
            assert_eq!(args.title, Some("intro".into()));
            assert_eq!(args.limit, 5);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_render_flavor() {
        let cli = Cli::try_parse_from(["folio", "render", "intro", "--flavor", "navigation"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert!(matches!(args.flavor, FlavorArg::Navigation));
            assert!(args.rev.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn preview_conflicts_with_rev() {
        assert!(Cli::try_parse_from([
            "folio", "render", "intro", "--rev", "head", "--preview", "draft.rst",
        ])
        .is_err());
    }

    #[test]
    fn parse_mv_and_revert() {
        let cli = Cli::try_parse_from(["folio", "mv", "old", "new"]).unwrap();
        assert!(matches!(cli.command, Command::Mv(ref a) if a.from == "old" && a.to == "new"));
        let cli = Cli::try_parse_from(["folio", "revert", "HEAD"]).unwrap();
        assert!(matches!(cli.command, Command::Revert(ref a) if a.rev == "HEAD"));
    }
}
