use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Public identity of a user, copied into posts and comments when they are written.
///
/// Not re-synced if the user later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// Whether a post carries a body of text or points at a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Link,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Link => "link",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(PostKind::Text),
            "link" => Ok(PostKind::Link),
            other => Err(DomainError::Validation(format!(
                "unknown post type '{other}', expected 'text' or 'link'"
            ))),
        }
    }
}

/// Direction of a vote cast by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Value stored in the vote entry: `1` or `-1`.
    pub fn value(self) -> i8 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// A single user's vote on a post. `vote` is always `1` or `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user: Uuid,
    pub vote: i8,
}

/// A comment owned by exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: Author,
    pub body: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: String, author: Author, body: String) -> Self {
        Self {
            id,
            author,
            body,
            created: Utc::now(),
        }
    }
}

/// Author-supplied fields of a post about to be created.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub category: String,
    pub kind: PostKind,
    pub text: Option<String>,
    pub url: Option<String>,
}

impl NewPost {
    /// Check the fields the author is responsible for.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::Validation(
                "category must not be empty".to_string(),
            ));
        }

        let body = match self.kind {
            PostKind::Text => &self.text,
            PostKind::Link => &self.url,
        };
        if body.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            let field = match self.kind {
                PostKind::Text => "text",
                PostKind::Link => "url",
            };
            return Err(DomainError::Validation(format!(
                "{} posts require a non-empty {field}",
                self.kind
            )));
        }

        Ok(())
    }
}

/// Post aggregate - the unit every store loads and saves as a whole.
///
/// `score` and `upvote_percentage` are derived from `votes` and are
/// recomputed by every vote mutation. `votes` holds at most one entry per user.
/// Neither `votes` nor `comments` keeps a stable order across removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Set on link posts, `null` otherwise.
    #[serde(default)]
    pub url: Option<String>,
    /// Set on text posts, `null` otherwise.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub category: String,
    pub author: Author,
    pub score: i32,
    pub upvote_percentage: u8,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
    pub created: DateTime<Utc>,
    pub views: u32,
}

impl Post {
    /// Create a post seeded with the author's own upvote.
    pub fn new(id: String, new_post: NewPost, author: Author) -> Self {
        let votes = vec![Vote {
            user: author.id,
            vote: VoteDirection::Up.value(),
        }];

        Self {
            id,
            title: new_post.title,
            url: new_post.url,
            text: new_post.text,
            kind: new_post.kind,
            category: new_post.category,
            author,
            score: 1,
            upvote_percentage: 100,
            votes,
            comments: Vec::new(),
            created: Utc::now(),
            views: 0,
        }
    }

    /// The value of `user`'s vote, if they have voted.
    pub fn vote_of(&self, user: Uuid) -> Option<i8> {
        self.votes.iter().find(|v| v.user == user).map(|v| v.vote)
    }

    /// Record `user`'s vote, overwriting any vote they cast before.
    pub fn apply_vote(&mut self, user: Uuid, direction: VoteDirection) {
        let value = direction.value();
        match self.votes.iter_mut().find(|v| v.user == user) {
            Some(existing) => existing.vote = value,
            None => self.votes.push(Vote { user, vote: value }),
        }
        self.recount();
    }

    /// Withdraw `user`'s vote. A user without a vote leaves the post untouched.
    pub fn apply_unvote(&mut self, user: Uuid) {
        if let Some(pos) = self.votes.iter().position(|v| v.user == user) {
            self.votes.swap_remove(pos);
            self.recount();
        }
    }

    /// Append a comment. Its id must already be assigned.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Remove the first comment with `comment_id` and return it.
    ///
    /// The last comment takes the removed one's slot.
    pub fn delete_comment(&mut self, comment_id: &str) -> Option<Comment> {
        let pos = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.swap_remove(pos))
    }

    fn recount(&mut self) {
        self.score = self.votes.iter().map(|v| i32::from(v.vote)).sum();

        let total = self.votes.len();
        let upvotes = self.votes.iter().filter(|v| v.vote > 0).count();
        // upvotes <= total, so the quotient never exceeds 100
        self.upvote_percentage = if total == 0 {
            0
        } else {
            (upvotes * 100 / total) as u8
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            username: name.to_string(),
        }
    }

    fn text_post(author: Author) -> Post {
        Post::new(
            "post-1".to_string(),
            NewPost {
                title: "Hello".to_string(),
                category: "music".to_string(),
                kind: PostKind::Text,
                text: Some("first!".to_string()),
                url: None,
            },
            author,
        )
    }

    fn vote_sum(post: &Post) -> i32 {
        post.votes.iter().map(|v| i32::from(v.vote)).sum()
    }

    #[test]
    fn test_new_post_is_seeded_with_author_upvote() {
        let u1 = author("u1");
        let post = text_post(u1.clone());

        assert_eq!(post.votes, vec![Vote { user: u1.id, vote: 1 }]);
        assert_eq!(post.score, 1);
        assert_eq!(post.upvote_percentage, 100);
        assert!(post.comments.is_empty());
        assert_eq!(post.views, 0);
    }

    #[test]
    fn test_vote_change_of_mind_and_unvote() {
        let u1 = author("u1");
        let u2 = author("u2");
        let mut post = text_post(u1.clone());

        post.apply_vote(u2.id, VoteDirection::Up);
        assert_eq!(
            post.votes,
            vec![Vote { user: u1.id, vote: 1 }, Vote { user: u2.id, vote: 1 }]
        );
        assert_eq!(post.score, 2);
        assert_eq!(post.upvote_percentage, 100);

        post.apply_vote(u2.id, VoteDirection::Down);
        assert_eq!(
            post.votes,
            vec![Vote { user: u1.id, vote: 1 }, Vote { user: u2.id, vote: -1 }]
        );
        assert_eq!(post.score, 0);
        assert_eq!(post.upvote_percentage, 50);

        post.apply_unvote(u2.id);
        assert_eq!(post.votes, vec![Vote { user: u1.id, vote: 1 }]);
        assert_eq!(post.score, 1);
        assert_eq!(post.upvote_percentage, 100);
    }

    #[test]
    fn test_repeated_votes_keep_one_entry_with_last_value() {
        let mut post = text_post(author("owner"));
        let voter = Uuid::new_v4();
        let sequence = [
            VoteDirection::Up,
            VoteDirection::Down,
            VoteDirection::Down,
            VoteDirection::Up,
            VoteDirection::Down,
        ];

        for direction in sequence {
            post.apply_vote(voter, direction);
        }

        let entries: Vec<_> = post.votes.iter().filter(|v| v.user == voter).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].vote, -1);
        assert_eq!(post.vote_of(voter), Some(-1));
    }

    #[test]
    fn test_score_and_percentage_track_votes_through_mixed_operations() {
        let owner = author("owner");
        let mut post = text_post(owner.clone());
        let voters: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();

        for (step, voter) in voters.iter().enumerate() {
            let direction = if step % 3 == 0 {
                VoteDirection::Down
            } else {
                VoteDirection::Up
            };
            post.apply_vote(*voter, direction);
            assert_eq!(post.score, vote_sum(&post));
            assert!(post.upvote_percentage <= 100);
        }

        for voter in voters.iter().step_by(2) {
            post.apply_unvote(*voter);
            assert_eq!(post.score, vote_sum(&post));
            assert!(post.upvote_percentage <= 100);
        }

        let ups = post.votes.iter().filter(|v| v.vote == 1).count();
        assert_eq!(
            usize::from(post.upvote_percentage),
            ups * 100 / post.votes.len()
        );
    }

    #[test]
    fn test_percentage_is_zero_when_every_vote_is_withdrawn() {
        let owner = author("owner");
        let mut post = text_post(owner.clone());

        post.apply_unvote(owner.id);

        assert!(post.votes.is_empty());
        assert_eq!(post.score, 0);
        assert_eq!(post.upvote_percentage, 0);
    }

    #[test]
    fn test_percentage_rounds_down() {
        let mut post = text_post(author("owner"));
        post.apply_vote(Uuid::new_v4(), VoteDirection::Up);
        post.apply_vote(Uuid::new_v4(), VoteDirection::Down);

        // 2 of 3 votes are up
        assert_eq!(post.upvote_percentage, 66);
        assert_eq!(post.score, 1);
    }

    #[test]
    fn test_unvote_is_idempotent() {
        let mut post = text_post(author("owner"));
        let voter = Uuid::new_v4();
        post.apply_vote(voter, VoteDirection::Down);

        post.apply_unvote(voter);
        let once = post.clone();
        post.apply_unvote(voter);

        assert_eq!(post, once);
    }

    #[test]
    fn test_unvote_without_vote_leaves_post_unchanged() {
        let mut post = text_post(author("owner"));
        let before = post.clone();

        post.apply_unvote(Uuid::new_v4());

        assert_eq!(post, before);
    }

    #[test]
    fn test_delete_comment_swaps_last_into_place() {
        let writer = author("writer");
        let mut post = text_post(author("owner"));
        for id in ["c1", "c2", "c3"] {
            post.add_comment(Comment::new(id.to_string(), writer.clone(), id.to_string()));
        }

        let removed = post.delete_comment("c1");

        assert_eq!(removed.map(|c| c.id), Some("c1".to_string()));
        let ids: Vec<_> = post.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c2"]);
    }

    #[test]
    fn test_delete_missing_comment_is_noop() {
        let mut post = text_post(author("owner"));
        post.add_comment(Comment::new("c1".to_string(), author("w"), "hi".to_string()));
        let before = post.clone();

        assert!(post.delete_comment("nope").is_none());
        assert_eq!(post, before);
    }

    #[test]
    fn test_new_post_validation() {
        let mut new_post = NewPost {
            title: "Link".to_string(),
            category: "news".to_string(),
            kind: PostKind::Link,
            text: Some("ignored".to_string()),
            url: None,
        };
        assert!(matches!(
            new_post.validate(),
            Err(DomainError::Validation(_))
        ));

        new_post.url = Some("https://example.com".to_string());
        assert!(new_post.validate().is_ok());

        new_post.title = "   ".to_string();
        assert!(new_post.validate().is_err());
    }

    #[test]
    fn test_post_kind_parsing() {
        assert_eq!("text".parse::<PostKind>().unwrap(), PostKind::Text);
        assert_eq!("link".parse::<PostKind>().unwrap(), PostKind::Link);
        assert!("video".parse::<PostKind>().is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let post = text_post(author("owner"));
        let json = serde_json::to_value(&post).unwrap();

        for field in [
            "id",
            "title",
            "url",
            "author",
            "category",
            "score",
            "votes",
            "comments",
            "created",
            "views",
            "type",
            "text",
            "upvotePercentage",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["type"], "text");
        assert!(json["url"].is_null());
        assert_eq!(json["votes"][0]["vote"], 1);
        assert_eq!(json["author"]["username"], "owner");
    }

    #[test]
    fn test_link_post_still_carries_text_field() {
        let post = Post::new(
            "post-2".to_string(),
            NewPost {
                title: "Docs".to_string(),
                category: "programming".to_string(),
                kind: PostKind::Link,
                text: None,
                url: Some("https://doc.rust-lang.org".to_string()),
            },
            author("owner"),
        );
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["type"], "link");
        assert_eq!(json["url"], "https://doc.rust-lang.org");
        assert!(json.get("text").is_some_and(|t| t.is_null()));

        let decoded: Post = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, post);
    }
}
