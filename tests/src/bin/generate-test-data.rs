use chrono::{Duration, TimeZone, Utc};
use rand::{seq::SliceRandom, Rng};
use readalong_api::{CommentId, ScopeId, Time, UserId, Uuid};
use readalong_mock_server::{Seed, SeedComment, SeedUser};

const NUM_USERS: usize = 8;

const NUM_ROOT_COMMENTS: usize = 40;
const MAX_REPLIES: usize = 12;
const MAX_DEPTH: usize = 3;
const COMMENT_WORD_COUNT: usize = 25;
const MAX_EXTRA_LIKES: u64 = 20;

const SPAN_DAYS: i64 = 30;

fn gen_comment_text(rng: &mut impl Rng) -> String {
    let words = rng.gen_range(1..=COMMENT_WORD_COUNT);
    lipsum::lipsum_words_from_seed(words, rng.gen())
}

fn gen_comment(
    rng: &mut impl Rng,
    users: &[SeedUser],
    after: Time,
    parent_id: Option<CommentId>,
) -> anyhow::Result<SeedComment> {
    let author = users
        .choose(rng)
        .ok_or_else(|| anyhow::anyhow!("no users to write comments"))?
        .id;
    Ok(SeedComment {
        id: CommentId(Uuid::new_v4()),
        author,
        text: gen_comment_text(rng),
        progress_percentage: rng.gen_range(0..=100),
        created_at: after + Duration::minutes(rng.gen_range(1..=60 * 24)),
        parent_id,
        like_count: rng.gen_range(0..=MAX_EXTRA_LIKES),
    })
}

/// Push `n` replies to `parent`, and recursively their own replies
fn gen_replies(
    rng: &mut impl Rng,
    users: &[SeedUser],
    comments: &mut Vec<SeedComment>,
    parent: &SeedComment,
    depth: usize,
) -> anyhow::Result<()> {
    if depth >= MAX_DEPTH {
        return Ok(());
    }
    let n = rng.gen_range(0..=MAX_REPLIES >> depth);
    for _ in 0..n {
        let reply = gen_comment(rng, users, parent.created_at, Some(parent.id))?;
        comments.push(reply.clone());
        gen_replies(rng, users, comments, &reply, depth + 1)?;
    }
    Ok(())
}

fn gen_seed(rng: &mut impl Rng) -> anyhow::Result<Seed> {
    let start = Utc
        .timestamp_opt(1_667_556_000, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid start date"))?;

    let users = (0..NUM_USERS)
        .map(|_| SeedUser {
            id: UserId(Uuid::new_v4()),
            name: lipsum::lipsum_words_from_seed(1, rng.gen()),
        })
        .collect::<Vec<_>>();

    // parents are always listed before their replies
    let mut comments = Vec::new();
    for _ in 0..NUM_ROOT_COMMENTS {
        let after = start + Duration::hours(rng.gen_range(0..SPAN_DAYS * 24));
        let root = gen_comment(rng, &users, after, None)?;
        comments.push(root.clone());
        gen_replies(rng, &users, &mut comments, &root, 0)?;
    }

    Ok(Seed {
        scope: ScopeId(Uuid::new_v4()),
        users,
        comments,
    })
}

fn main() -> anyhow::Result<()> {
    let seed = gen_seed(&mut rand::thread_rng())?;
    println!("{}", serde_json::to_string_pretty(&seed)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_seed_loads_into_mock_server() {
        let seed = gen_seed(&mut rand::thread_rng()).expect("generating seed");
        assert_eq!(seed.users.len(), NUM_USERS);
        assert!(seed.comments.iter().all(|c| !c.text.trim().is_empty()));

        let json = serde_json::to_string(&seed).expect("serializing seed");
        let parsed: Seed = serde_json::from_str(&json).expect("parsing seed");
        assert_eq!(parsed, seed);

        let server = readalong_mock_server::MockServer::from_seed(10, &parsed)
            .expect("loading seed into mock server");
        assert_eq!(server.test_num_comments(), seed.comments.len());
    }
}
