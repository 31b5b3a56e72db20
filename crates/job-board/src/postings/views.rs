use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{
    Application, ApplicationId, Comment, CommentId, Essential, JobPost, JobPostDetail, MemberId,
    PostId,
};

const TIMESTAMP_FORMAT: &str = "%y.%m.%d %H:%M";

fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Listing projection of a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPostView {
    pub id: PostId,
    pub author: String,
    pub title: String,
    pub location: String,
    pub view_count: u64,
    pub comments_count: u64,
    pub application_count: u64,
    pub interests_count: u64,
    pub deadline: NaiveDate,
    pub closed: bool,
    pub employed: bool,
    pub created_at: String,
}

impl JobPostView {
    pub fn from_entity(post: &JobPost) -> Self {
        Self {
            id: post.id,
            author: post.author.clone(),
            title: post.title.clone(),
            location: post.location.clone(),
            view_count: post.view_count,
            comments_count: post.comments_count,
            application_count: post.application_count,
            interests_count: post.interests_count,
            deadline: post.deadline,
            closed: post.closed,
            employed: post.employed,
            created_at: format_timestamp(post.created_at),
        }
    }

    pub fn from_entities<'a, I>(posts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a JobPost>,
    {
        posts.into_iter().map(Self::from_entity).collect()
    }
}

/// Full projection combining the post, its detail, and its eligibility criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPostDetailView {
    #[serde(flatten)]
    pub summary: JobPostView,
    pub body: String,
    pub min_age: u32,
    pub gender: &'static str,
    pub modified_at: String,
}

impl JobPostDetailView {
    pub fn from_entity(post: &JobPost, detail: &JobPostDetail, essential: &Essential) -> Self {
        Self {
            summary: JobPostView {
                author: detail.author.clone(),
                ..JobPostView::from_entity(post)
            },
            body: detail.body.clone(),
            min_age: essential.min_age,
            gender: essential.gender.label(),
            modified_at: format_timestamp(post.modified_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub member_id: MemberId,
    pub body: String,
    pub status: &'static str,
    pub created_at: String,
}

impl ApplicationView {
    pub fn from_entity(application: &Application) -> Self {
        Self {
            id: application.id,
            member_id: application.member_id,
            body: application.body.clone(),
            status: application.status.label(),
            created_at: format_timestamp(application.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub author: String,
    pub content: String,
    pub created_at: String,
    pub modified_at: String,
}

impl CommentView {
    pub fn from_entity(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: format_timestamp(comment.created_at),
            modified_at: format_timestamp(comment.modified_at),
        }
    }
}
