use super::domain::{Comment, CommentId, PostId};
use super::forms::CommentForm;
use super::repository::{JobPostRepository, MemberDirectory, NotificationPublisher};
use super::service::{next_comment_id, JobPostService, JobPostServiceError, NotAllowedReason};
use super::views::CommentView;

impl<R, M, N> JobPostService<R, M, N>
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn write_comment(
        &self,
        actor: &str,
        post_id: PostId,
        form: CommentForm,
    ) -> Result<CommentId, JobPostServiceError> {
        form.validate()?;
        let mut aggregate = self.aggregate(post_id)?;
        let member = self.member(actor)?;

        let comment = Comment::new(
            next_comment_id(),
            post_id,
            &member,
            form.content,
            self.clock.now(),
        );
        let comment_id = comment.id;
        aggregate.comments.push(comment);
        aggregate.post.increase_comments_count();
        self.posts.update(aggregate)?;
        Ok(comment_id)
    }

    pub fn modify_comment(
        &self,
        actor: &str,
        post_id: PostId,
        comment_id: CommentId,
        form: CommentForm,
    ) -> Result<(), JobPostServiceError> {
        form.validate()?;
        let mut aggregate = self.aggregate(post_id)?;
        let now = self.clock.now();

        let comment = aggregate
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or(JobPostServiceError::CommentNotFound(comment_id))?;
        if comment.author != actor {
            return Err(NotAllowedReason::NotCommentAuthor.into());
        }
        comment.update(form.content, now);
        self.posts.update(aggregate)?;
        Ok(())
    }

    /// Remove a comment as its author or as an administrator.
    pub fn delete_comment(
        &self,
        actor: &str,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<(), JobPostServiceError> {
        let mut aggregate = self.aggregate(post_id)?;
        let member = self.member(actor)?;

        let comment = aggregate
            .comments
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or(JobPostServiceError::CommentNotFound(comment_id))?;
        if !(member.is_admin() || comment.member_id == member.id) {
            return Err(NotAllowedReason::NotCommentAuthor.into());
        }

        aggregate.comments.retain(|comment| comment.id != comment_id);
        aggregate.post.decrease_comments_count();
        self.posts.update(aggregate)?;
        Ok(())
    }

    pub fn find_comments(&self, post_id: PostId) -> Result<Vec<CommentView>, JobPostServiceError> {
        let aggregate = self.aggregate(post_id)?;
        Ok(aggregate
            .comments
            .iter()
            .map(CommentView::from_entity)
            .collect())
    }
}
