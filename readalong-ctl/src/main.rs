use std::{collections::VecDeque, path::PathBuf};

use anyhow::{anyhow, Context};
use readalong_client::{
    api::{AuthToken, Comment, CommentId, Reader, ReadingStatus, SortMode, Uuid},
    visibility, Discussion, DiscussionConfig, Scope,
};
use readalong_mock_server::{MockServer, Seed};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Discussion seed, as generated by `generate-test-data`
    #[structopt(short, long)]
    seed: PathBuf,

    /// Index of the seeded user to act as
    #[structopt(short, long, default_value = "0")]
    user: usize,

    #[structopt(long, default_value = "10")]
    page_size: u32,

    /// One of created_asc, created_desc, page_asc, page_desc
    #[structopt(long, default_value = "created_desc")]
    sort: SortMode,

    /// How far in the book the user is, in percent
    #[structopt(long, default_value = "100")]
    progress: u8,

    /// One of want, reading, read
    #[structopt(long, default_value = "reading", parse(try_from_str = parse_status))]
    status: ReadingStatus,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print the whole discussion
    Show,

    /// Like or unlike a comment
    Like {
        comment: Uuid,
    },

    /// Post a comment
    Post {
        text: String,

        /// Comment to reply to
        #[structopt(long)]
        reply_to: Option<Uuid>,
    },

    /// Delete one of the user's comments
    Delete {
        comment: Uuid,
    },
}

fn parse_status(s: &str) -> anyhow::Result<ReadingStatus> {
    match s {
        "want" => Ok(ReadingStatus::WantToRead),
        "reading" => Ok(ReadingStatus::CurrentlyReading),
        "read" => Ok(ReadingStatus::Read),
        _ => Err(anyhow!("unknown reading status {s:?}")),
    }
}

type Client = Discussion<MockServer, AuthToken>;

/// Fetch every page of every scope
async fn load_everything(d: &Client) -> anyhow::Result<()> {
    while d.state().pages.can_fetch(&Scope::Root) {
        d.load_more_root().await.context("loading more comments")?;
    }
    let mut todo = d.view().into_iter().collect::<VecDeque<_>>();
    while let Some(c) = todo.pop_front() {
        if c.total_reply_count > 0 {
            while d.state().pages.can_fetch(&Scope::Replies(c.id)) {
                if let Err(err) = d.load_replies(c.id).await {
                    tracing::warn!(comment_id = ?c.id, %err, "failed loading replies");
                }
            }
        }
        if let Some(c) = d.state().tree.subtree(&c.id) {
            todo.extend(c.replies);
        }
    }
    Ok(())
}

fn print_comments(comments: &[Comment], reader: &Reader, depth: usize) {
    for c in comments {
        let indent = "  ".repeat(depth);
        let liked = if c.liked_by_current_user { ", liked" } else { "" };
        match visibility::visible_text(c, reader) {
            Some(text) => println!(
                "{indent}[{:>3}%] {}: {text} ({} likes{liked}) {}",
                c.progress_percentage, c.author_display_name, c.like_count, c.id.0
            ),
            None => println!(
                "{indent}[{:>3}%] {}: <spoiler> ({} likes{liked}) {}",
                c.progress_percentage, c.author_display_name, c.like_count, c.id.0
            ),
        }
        print_comments(&c.replies, reader, depth + 1);
        let missing = c.total_reply_count.saturating_sub(c.replies.len() as u64);
        if missing > 0 {
            println!("{indent}  ... {missing} more replies");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let seed = std::fs::read(&opt.seed)
        .with_context(|| format!("reading seed file {:?}", opt.seed))?;
    let seed: Seed = serde_json::from_slice(&seed).context("parsing seed file")?;
    let server =
        MockServer::from_seed(opt.page_size, &seed).context("loading seed into mock server")?;
    let user = seed
        .users
        .get(opt.user)
        .ok_or_else(|| anyhow!("seed only has {} users", seed.users.len()))?;
    let token = server.login(user.id).context("logging in")?;
    tracing::info!(user = %user.name, "logged in");

    let config = DiscussionConfig::new(seed.scope)
        .with_page_size(opt.page_size)
        .with_sort(opt.sort);
    let d = Discussion::new(server, token, config, Reader::new(opt.status, opt.progress));
    d.load_root().await.context("loading discussion")?;
    load_everything(&d).await?;

    match opt.cmd {
        Command::Show => (),
        Command::Like { comment } => {
            let outcome = d
                .toggle_like(CommentId(comment))
                .await
                .context("toggling like")?;
            tracing::info!(?outcome, "toggled like");
        }
        Command::Post { text, reply_to } => {
            d.submit_comment(&text, reply_to.map(CommentId))
                .await
                .context("posting comment")?;
            load_everything(&d).await?;
        }
        Command::Delete { comment } => {
            let confirmation = d
                .request_delete(CommentId(comment))
                .ok_or_else(|| anyhow!("comment {comment} is not in the discussion"))?;
            d.delete_comment(confirmation)
                .await
                .context("deleting comment")?;
        }
    }

    print_comments(&d.view(), &d.reader(), 0);
    for notice in d.take_notices() {
        tracing::warn!(?notice, "notice");
    }

    Ok(())
}
