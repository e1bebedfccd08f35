use std::fs;
use std::io::{self, Read, Write};

use anyhow::Context;
use colored::Colorize;
use folio_core::{Author, Flavor, ObjectId, Wiki, WikiConfig, CONFIG_FILE};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = Ctx {
        format: cli.format,
        repo: cli.repo,
    };
    match cli.command {
        Command::Init => cmd_init(&ctx),
        Command::Ls(args) => cmd_ls(&ctx, args),
        Command::Cat(args) => cmd_cat(&ctx, args),
        Command::Edit(args) => cmd_edit(&ctx, args),
        Command::Mv(args) => cmd_mv(&ctx, args),
        Command::Log(args) => cmd_log(&ctx, args),
        Command::Diff(args) => cmd_diff(&ctx, args),
        Command::Revert(args) => cmd_revert(&ctx, args),
        Command::Render(args) => cmd_render(&ctx, args),
    }
}

struct Ctx {
    format: OutputFormat,
    repo: std::path::PathBuf,
}

impl Ctx {
    fn open(&self) -> anyhow::Result<Wiki> {
        Wiki::open(&self.repo)
            .with_context(|| format!("cannot open repository at {}", self.repo.display()))
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// `HEAD` (any case) or a full revision id; `None` means head.
fn revision(wiki: &Wiki, rev: Option<&str>) -> anyhow::Result<ObjectId> {
    match rev {
        None => Ok(wiki.head()?),
        Some(r) if r.eq_ignore_ascii_case("head") => Ok(wiki.head()?),
        Some(r) => Ok(wiki.parse_revision(r)?),
    }
}

fn author(wiki: &Wiki, args: &AuthorArgs) -> anyhow::Result<Author> {
    let configured = &wiki.config().author;
    let name = args.author.clone().unwrap_or_else(|| configured.name.clone());
    let email = args.email.clone().unwrap_or_else(|| configured.email.clone());
    Ok(Author::new(name, email)?)
}

fn flavor(arg: FlavorArg) -> Flavor {
    match arg {
        FlavorArg::Plain => Flavor::Plain,
        FlavorArg::Navigation => Flavor::Navigation,
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(ctx: &Ctx) -> anyhow::Result<()> {
    fs::create_dir_all(&ctx.repo)?;
    if !ctx.repo.join(CONFIG_FILE).exists() {
        WikiConfig::default().save(&ctx.repo)?;
    }
    let wiki = ctx.open()?;
    let head = wiki.head()?;
    if ctx.json() {
        return print_json(&json!({ "path": ctx.repo, "head": head }));
    }
    println!(
        "{} Initialized Folio repository in {}",
        "✓".green().bold(),
        ctx.repo.display().to_string().bold()
    );
    println!("  Head: {}", head.short_hex().yellow());
    Ok(())
}

fn cmd_ls(ctx: &Ctx, args: LsArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let rev = revision(&wiki, args.rev.as_deref())?;
    let pages = wiki.list_pages(&rev)?;
    if ctx.json() {
        return print_json(&json!(pages));
    }
    if pages.is_empty() {
        println!("No pages.");
    }
    for title in pages {
        println!("{title}");
    }
    Ok(())
}

fn cmd_cat(ctx: &Ctx, args: CatArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let rev = revision(&wiki, args.rev.as_deref())?;
    let content = wiki.resolve(&args.title, &rev)?;
    io::stdout().write_all(&content)?;
    Ok(())
}

fn cmd_edit(ctx: &Ctx, args: EditArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let content = match &args.file {
        Some(path) => fs::read(path).with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let author = author(&wiki, &args.author)?;
    let rev = wiki.commit_edit(&args.title, &args.message, &content, author)?;
    if ctx.json() {
        return print_json(&json!({ "revision": rev, "title": args.title }));
    }
    println!(
        "{} Saved {} as {}",
        "✓".green().bold(),
        args.title.bold(),
        rev.short_hex().yellow()
    );
    Ok(())
}

fn cmd_mv(ctx: &Ctx, args: MvArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let author = author(&wiki, &args.author)?;
    let rev = wiki.commit_move(&args.from, &args.to, author)?;
    if ctx.json() {
        return print_json(&json!({ "revision": rev, "from": args.from, "to": args.to }));
    }
    println!(
        "{} Moved {} to {} as {}",
        "✓".green().bold(),
        args.from.bold(),
        args.to.bold(),
        rev.short_hex().yellow()
    );
    Ok(())
}

fn cmd_log(ctx: &Ctx, args: LogArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let mut entries = wiki.page_log(args.title.as_deref())?;
    entries.truncate(args.limit);
    if ctx.json() {
        return print_json(&serde_json::to_value(&entries)?);
    }
    if entries.is_empty() {
        println!("No revisions.");
    }
    for entry in entries {
        println!(
            "{}  {}  {}",
            entry.revision.short_hex().yellow().bold(),
            entry.time.dimmed(),
            entry.title.as_deref().unwrap_or("-").cyan()
        );
        println!("  {} ({})", entry.message, entry.author);
    }
    Ok(())
}

fn cmd_diff(ctx: &Ctx, args: DiffArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let rev = revision(&wiki, Some(args.rev.as_str()))?;
    let patch = wiki.revision_patch(&rev)?;
    if ctx.json() {
        return print_json(&json!({ "revision": rev, "patch": patch }));
    }
    if patch.is_empty() {
        println!("No changes.");
    }
    for line in patch.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") || line.starts_with("rename ") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("{styled}");
    }
    Ok(())
}

fn cmd_revert(ctx: &Ctx, args: RevertArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let target = revision(&wiki, Some(args.rev.as_str()))?;
    let author = author(&wiki, &args.author)?;
    let outcome = wiki.commit_revert(&target, author)?;
    if ctx.json() {
        return print_json(&serde_json::to_value(&outcome)?);
    }
    println!(
        "{} Reverted {} on {} as {}",
        "✓".green().bold(),
        target.short_hex().yellow(),
        outcome.title.bold(),
        outcome.revision.short_hex().yellow()
    );
    Ok(())
}

fn cmd_render(ctx: &Ctx, args: RenderArgs) -> anyhow::Result<()> {
    let wiki = ctx.open()?;
    let flavor = flavor(args.flavor);
    let html = match &args.preview {
        Some(path) => {
            let content =
                fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
            wiki.render_preview(&args.title, &content, flavor)?.into_bytes()
        }
        None => {
            let rev = revision(&wiki, args.rev.as_deref())?;
            wiki.get_or_render(&args.title, &rev, flavor)?
        }
    };
    io::stdout().write_all(&html)?;
    Ok(())
}
