//! In-process implementations of the storage and notification contracts.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::domain::{JobPost, JobPostAggregate, JobPostDetail, Member, MemberId, PostId};
use super::repository::{
    ApplicantNotification, JobPostRepository, MemberDirectory, NotificationError,
    NotificationPublisher, RepositoryError,
};

/// Member directory backed by a map keyed by username.
#[derive(Default, Clone)]
pub struct InMemoryMemberDirectory {
    members: Arc<Mutex<HashMap<String, Member>>>,
}

impl InMemoryMemberDirectory {
    pub fn with_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Member>,
    {
        let directory = Self::default();
        for member in members {
            directory.register(member);
        }
        directory
    }

    pub fn register(&self, member: Member) {
        let mut guard = self.members.lock().expect("directory mutex poisoned");
        guard.insert(member.username.clone(), member);
    }

    pub fn len(&self) -> usize {
        self.members.lock().expect("directory mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<Member>, RepositoryError> {
        let guard = self.members.lock().expect("directory mutex poisoned");
        Ok(guard.get(username).cloned())
    }

    fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError> {
        let guard = self.members.lock().expect("directory mutex poisoned");
        Ok(guard.values().find(|member| member.id == id).cloned())
    }
}

/// Posting arena keyed by [`PostId`]; listings come back in id order.
#[derive(Default, Clone)]
pub struct InMemoryJobPostRepository {
    records: Arc<Mutex<BTreeMap<PostId, JobPostAggregate>>>,
}

impl InMemoryJobPostRepository {
    fn select<F>(&self, predicate: F) -> Vec<JobPost>
    where
        F: Fn(&JobPostAggregate) -> bool,
    {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .values()
            .filter(|aggregate| predicate(aggregate))
            .map(|aggregate| aggregate.post.clone())
            .collect()
    }
}

impl JobPostRepository for InMemoryJobPostRepository {
    fn insert(&self, aggregate: JobPostAggregate) -> Result<JobPostAggregate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&aggregate.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(aggregate.id(), aggregate.clone());
        Ok(aggregate)
    }

    fn fetch(&self, id: PostId) -> Result<Option<JobPostAggregate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn update(&self, aggregate: JobPostAggregate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&aggregate.id()) {
            Some(slot) => {
                let closed = slot.post.closed || aggregate.post.closed;
                *slot = aggregate;
                slot.post.closed = closed;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<JobPost>, RepositoryError> {
        Ok(self.select(|_| true))
    }

    fn by_member(&self, member_id: MemberId) -> Result<Vec<JobPost>, RepositoryError> {
        Ok(self.select(|aggregate| aggregate.post.member_id == member_id))
    }

    fn interested_by(&self, member_id: MemberId) -> Result<Vec<JobPost>, RepositoryError> {
        Ok(self.select(|aggregate| aggregate.has_interest(member_id)))
    }

    fn expired(&self, before: NaiveDate) -> Result<Vec<JobPost>, RepositoryError> {
        Ok(self.select(|aggregate| aggregate.post.is_expired(before)))
    }

    fn find_detail_by_post_and_author(
        &self,
        id: PostId,
        author: &str,
    ) -> Result<Option<JobPostDetail>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(&id)
            .map(|aggregate| &aggregate.detail)
            .filter(|detail| detail.author == author)
            .cloned())
    }
}

/// Publisher that keeps every notification for later inspection.
#[derive(Default, Clone)]
pub struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<ApplicantNotification>>>,
}

impl InMemoryNotificationPublisher {
    pub fn events(&self) -> Vec<ApplicantNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: ApplicantNotification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}
