use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use revgraph::objects::object_id::ObjectId;
use revgraph::stats::compute_stats;
use revgraph::store::ObjectStore;
use revgraph::store::loose::LooseStore;
use revgraph::walk::{RevisionWalker, SortMode, missing_commits};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "revgraph",
    version = "0.1.0",
    about = "Revision-graph traversal and per-commit diff statistics",
    long_about = "Walks a content-addressed commit store: ordered history listings, \
    per-commit added/deleted line counts computed in parallel, and the set of \
    commits one store holds that another does not.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        long = "store",
        global = true,
        default_value = ".",
        help = "Path to the object store root"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "log",
        about = "List commit history",
        long_about = "This command walks the history reachable from a revision \
        (or an A..B range) and prints each commit, newest first."
    )]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "Revision spec or A..B range")]
        revision: String,
        #[arg(long, help = "Emit no parent before any of its listed children")]
        topo_order: bool,
        #[arg(long, help = "Invert the output order")]
        reverse: bool,
        #[arg(long, help = "Follow only the first parent of each commit")]
        first_parent: bool,
        #[arg(long, help = "Skip commits with more than one parent")]
        no_merges: bool,
        #[arg(long, value_name = "N", help = "Skip the first N commits")]
        skip: Option<usize>,
        #[arg(short = 'n', long, value_name = "N", help = "Stop after N commits")]
        max_count: Option<usize>,
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(
        name = "stats",
        about = "Per-commit added/deleted line counts",
        long_about = "This command walks the history reachable from a revision and \
        prints each commit's added and deleted line counts against its first parent, \
        computed in parallel."
    )]
    Stats {
        #[arg(index = 1, default_value = "HEAD", help = "Revision spec or A..B range")]
        revision: String,
        #[arg(short = 'n', long, value_name = "N", help = "Stop after N commits")]
        max_count: Option<usize>,
    },
    #[command(
        name = "missing",
        about = "Commits present in another store but not in this one",
        long_about = "This command lists the commits reachable from a tip in a remote \
        store that are not covered by the local tip's lineage, newest first."
    )]
    Missing {
        #[arg(index = 1, help = "Path to the remote object store root")]
        remote_store: PathBuf,
        #[arg(long, default_value = "HEAD", help = "Tip revision in the local store")]
        local_tip: String,
        #[arg(long, default_value = "HEAD", help = "Tip revision in the remote store")]
        remote_tip: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = LooseStore::open(&cli.store)?;

    match &cli.command {
        Commands::Log {
            revision,
            topo_order,
            reverse,
            first_parent,
            no_merges,
            skip,
            max_count,
            oneline,
        } => {
            let mut sort_mode = SortMode::TIME;
            if *topo_order {
                sort_mode |= SortMode::TOPOLOGICAL;
            }
            if *reverse {
                sort_mode |= SortMode::REVERSE;
            }

            let mut walker = RevisionWalker::new(&store);
            walker.sorting(sort_mode);
            push_revision(&mut walker, revision)?;
            walker
                .frontier_mut()
                .set_simplify_first_parent(*first_parent)
                .set_no_merges(*no_merges)
                .set_offset(skip.unwrap_or(0))
                .set_limit(*max_count);

            for commit in walker.commits() {
                let commit = commit?;
                if *oneline {
                    println!(
                        "{} {}",
                        commit.id().to_short_oid().yellow(),
                        commit.short_message()
                    );
                } else {
                    println!("commit {}", commit.id().as_ref().yellow());
                    println!("Author: {}", commit.author().display_name());
                    println!("Date:   {}", commit.author().readable_timestamp());
                    println!();
                    for line in commit.message().lines() {
                        println!("    {line}");
                    }
                    println!();
                }
            }
        }
        Commands::Stats {
            revision,
            max_count,
        } => {
            let mut walker = RevisionWalker::new(&store);
            walker.sorting(SortMode::TIME);
            push_revision(&mut walker, revision)?;
            // merges add no lines of their own, only first-parent diffs count
            walker
                .frontier_mut()
                .set_no_merges(true)
                .set_limit(*max_count);

            let commits: Vec<ObjectId> = walker.collect::<Result<_>>()?;
            let stats = compute_stats(&store, &commits)?;

            let mut total_additions = 0;
            let mut total_deletions = 0;
            for entry in &stats {
                total_additions += entry.additions;
                total_deletions += entry.deletions;
                println!(
                    "{} {:>6} {:>6}  {}",
                    entry.oid.to_short_oid().yellow(),
                    format!("+{}", entry.additions).green(),
                    format!("-{}", entry.deletions).red(),
                    entry.author.display_name()
                );
            }
            println!(
                "{} commits, {} {}",
                stats.len(),
                format!("+{total_additions}").green(),
                format!("-{total_deletions}").red()
            );
        }
        Commands::Missing {
            remote_store,
            local_tip,
            remote_tip,
        } => {
            let remote = LooseStore::open(remote_store)?;
            let local_tip = store.resolve(local_tip)?;
            let remote_tip = remote.resolve(remote_tip)?;

            for oid in missing_commits(&store, &local_tip, &remote, &remote_tip)? {
                let commit = remote.require_commit(&oid)?;
                println!(
                    "{} {}",
                    oid.to_short_oid().yellow(),
                    commit.short_message()
                );
            }
        }
    }

    Ok(())
}

fn push_revision(walker: &mut RevisionWalker<'_, LooseStore>, revision: &str) -> Result<()> {
    if revision.contains("..") {
        walker.push_range(revision)
    } else {
        walker.push(revision)
    }
}
