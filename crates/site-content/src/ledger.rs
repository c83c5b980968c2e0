use site_types::{Inquiry, InquiryDraft, InquiryFilter, InquiryId, InquiryStatus, Locale};
use tracing::{debug, info};

use crate::error::{ContentError, ContentResult};
use crate::store::ContentStore;
use crate::validation::validate_inquiry;

/// Visitor inquiries, shared by both locales.
///
/// There is one list; both locale slots of the stored blob are written
/// from it in the same persisted step, so they can never disagree.
pub struct InquiryLedger<'a> {
    store: &'a mut ContentStore,
}

impl<'a> InquiryLedger<'a> {
    pub(crate) fn new(store: &'a mut ContentStore) -> Self {
        Self { store }
    }

    /// Validate and record a contact-form submission.
    ///
    /// The new inquiry is unread, dated today and placed first. An empty
    /// inquiry type is recorded as the `cn` institutional label; the list
    /// is shared by both locales, so the fallback cannot depend on the page
    /// the visitor submitted from. On a validation failure nothing is
    /// stored and the draft can be corrected and resubmitted.
    pub fn submit(&mut self, draft: &InquiryDraft) -> ContentResult<Inquiry> {
        let errors = validate_inquiry(draft);
        if !errors.is_empty() {
            debug!(%errors, "inquiry rejected");
            return Err(ContentError::Validation(errors));
        }

        let inquiry = self.store.commit("inquiry.submit", |tree, ids| {
            let inquiry_type = if draft.inquiry_type.trim().is_empty() {
                tree.content(Locale::Cn)
                    .contact
                    .form
                    .type_options
                    .institutional
                    .clone()
            } else {
                draft.inquiry_type.clone()
            };
            let inquiry = Inquiry {
                id: ids.next_id()?,
                name: draft.name.trim().to_string(),
                email: draft.email.clone(),
                inquiry_type,
                message: draft.message.clone(),
                date: ids.today(),
                status: InquiryStatus::Unread,
            };
            tree.inquiries_mut().insert(0, inquiry.clone());
            Ok(inquiry)
        })?;
        info!(id = inquiry.id, "inquiry submitted");
        Ok(inquiry)
    }

    /// Mark an inquiry read. Already-read inquiries are returned as-is
    /// without a write.
    pub fn mark_read(&mut self, id: InquiryId) -> ContentResult<Inquiry> {
        let current = self.get(id).ok_or_else(|| not_found(id))?;
        if !current.status.is_unread() {
            return Ok(current);
        }
        self.store.commit("inquiry.mark_read", |tree, _| {
            let inquiry = tree
                .inquiries_mut()
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| not_found(id))?;
            inquiry.mark_read();
            Ok(inquiry.clone())
        })
    }

    /// Delete an inquiry from both locale slots.
    pub fn remove(&mut self, id: InquiryId) -> ContentResult<Inquiry> {
        self.store.commit("inquiry.remove", |tree, _| {
            let list = tree.inquiries_mut();
            let pos = list.iter().position(|i| i.id == id).ok_or_else(|| not_found(id))?;
            Ok(list.remove(pos))
        })
    }

    /// Inquiries passing `filter`, newest first.
    pub fn list(&self, filter: InquiryFilter) -> Vec<Inquiry> {
        self.store.get().list_inquiries(filter)
    }

    pub fn get(&self, id: InquiryId) -> Option<Inquiry> {
        self.store
            .get()
            .inquiries()
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.store
            .get()
            .inquiries()
            .iter()
            .filter(|i| i.status.is_unread())
            .count()
    }
}

fn not_found(id: InquiryId) -> ContentError {
    ContentError::NotFound {
        kind: "inquiry",
        id,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::Value;
    use site_store::{InMemoryKvStore, KvStore};
    use site_types::FixedClock;

    use super::*;
    use crate::config::StoreConfig;
    use crate::tree::ContentTree;

    // 2024-06-20T08:00:00Z
    const JUNE_20: u64 = 1_718_870_400_000;

    fn open() -> (Arc<InMemoryKvStore>, Arc<FixedClock>, ContentStore) {
        let backend = Arc::new(InMemoryKvStore::new());
        let clock = Arc::new(FixedClock::new(JUNE_20));
        let store = ContentStore::open(backend.clone(), StoreConfig::default())
            .unwrap()
            .with_clock(clock.clone());
        (backend, clock, store)
    }

    fn zhang() -> InquiryDraft {
        InquiryDraft::new("Zhang", "zhang@example.com", "institutional", "interested")
    }

    #[test]
    fn submit_replicates_to_both_slots() {
        let (backend, _clock, mut store) = open();
        let before = store.inquiries().list(InquiryFilter::All).len();

        let inquiry = store.inquiries().submit(&zhang()).unwrap();
        assert_eq!(inquiry.id, JUNE_20);
        assert_eq!(inquiry.status, InquiryStatus::Unread);
        assert_eq!(inquiry.date, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
        assert_eq!(inquiry.inquiry_type, "institutional");

        let list = store.inquiries().list(InquiryFilter::All);
        assert_eq!(list.len(), before + 1);
        assert_eq!(list[0], inquiry);

        let tree = store.get();
        assert_eq!(tree.locale(Locale::Cn).inquiries()[0], inquiry);
        assert_eq!(
            tree.locale(Locale::Cn).inquiries(),
            tree.locale(Locale::En).inquiries()
        );

        let raw = backend.get("site_content_v1").unwrap().unwrap();
        let blob: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(blob["cn"]["inquiries"], blob["en"]["inquiries"]);
        assert_eq!(blob["en"]["inquiries"][0]["name"], "Zhang");
        assert_eq!(blob["en"]["inquiries"][0]["status"], "unread");
        assert_eq!(blob["en"]["inquiries"][0]["date"], "2024-06-20");
    }

    #[test]
    fn invalid_submission_changes_nothing() {
        let (backend, _clock, mut store) = open();
        let draft = InquiryDraft::new("", "bad", "", "");
        let err = store.inquiries().submit(&draft).unwrap_err();
        let errors = match err {
            ContentError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(store.inquiries().list(InquiryFilter::All).len(), 2);
        assert!(backend.is_empty());
        // The draft is still the caller's to correct.
        assert_eq!(draft.email, "bad");
    }

    #[test]
    fn empty_type_falls_back_to_cn_institutional_label() {
        let (_backend, _clock, mut store) = open();
        let draft = InquiryDraft::new("Alice", "alice@example.com", "  ", "hi");
        let inquiry = store.inquiries().submit(&draft).unwrap();
        assert_eq!(inquiry.inquiry_type, "机构投资者");
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let (_backend, clock, mut store) = open();
        let a = store.inquiries().submit(&zhang()).unwrap();
        let b = store.inquiries().submit(&zhang()).unwrap();
        assert_eq!(b.id, a.id + 1);
        clock.set(JUNE_20 - 10_000);
        let c = store.inquiries().submit(&zhang()).unwrap();
        assert!(c.id > b.id);
        let list = store.inquiries().list(InquiryFilter::All);
        assert_eq!(list[0].id, c.id);
    }

    #[test]
    fn mark_read_is_monotonic_and_idempotent() {
        let (backend, _clock, mut store) = open();
        let inquiry = store.inquiries().submit(&zhang()).unwrap();
        assert_eq!(store.inquiries().unread_count(), 2);

        let read = store.inquiries().mark_read(inquiry.id).unwrap();
        assert_eq!(read.status, InquiryStatus::Read);
        assert_eq!(store.inquiries().unread_count(), 1);

        backend.set_read_only(true);
        // No write needed for an already-read inquiry.
        let again = store.inquiries().mark_read(inquiry.id).unwrap();
        assert_eq!(again.status, InquiryStatus::Read);
        assert_eq!(
            store.inquiries().get(inquiry.id).unwrap().status,
            InquiryStatus::Read
        );
    }

    #[test]
    fn mark_read_unknown_id() {
        let (_backend, _clock, mut store) = open();
        assert!(matches!(
            store.inquiries().mark_read(99),
            Err(ContentError::NotFound { kind: "inquiry", id: 99 })
        ));
    }

    #[test]
    fn remove_deletes_from_both_slots() {
        let (backend, _clock, mut store) = open();
        let removed = store.inquiries().remove(2).unwrap();
        assert_eq!(removed.name, "Alice Smith");
        assert!(store.inquiries().get(2).is_none());

        let raw = backend.get("site_content_v1").unwrap().unwrap();
        let blob: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(blob["cn"]["inquiries"].as_array().unwrap().len(), 1);
        assert_eq!(blob["cn"]["inquiries"], blob["en"]["inquiries"]);
    }

    #[test]
    fn remove_unknown_id_writes_nothing() {
        let (backend, _clock, mut store) = open();
        assert!(matches!(
            store.inquiries().remove(42),
            Err(ContentError::NotFound { .. })
        ));
        assert!(backend.is_empty());
    }

    #[test]
    fn ids_continue_after_reopen() {
        let (backend, _clock, mut store) = open();
        let first = store.inquiries().submit(&zhang()).unwrap();
        drop(store);

        let mut reopened = ContentStore::open(backend, StoreConfig::default())
            .unwrap()
            .with_clock(Arc::new(FixedClock::new(JUNE_20 - 1)));
        let second = reopened.inquiries().submit(&zhang()).unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn submit_after_max_stored_id_fails_cleanly() {
        let backend = Arc::new(InMemoryKvStore::new());
        let mut blob = serde_json::to_value(ContentTree::builtin().unwrap()).unwrap();
        for locale in ["cn", "en"] {
            blob[locale]["inquiries"][0]["id"] = serde_json::json!(u64::MAX);
        }
        backend.set("site_content_v1", &blob.to_string()).unwrap();

        let mut store = ContentStore::open(backend, StoreConfig::default())
            .unwrap()
            .with_clock(Arc::new(FixedClock::new(JUNE_20)));
        assert!(store.load_anomaly().is_none());
        let err = store.inquiries().submit(&zhang()).unwrap_err();
        assert!(matches!(err, ContentError::SchemaViolation(ref msg) if msg.contains("exhausted")));
        assert_eq!(store.inquiries().list(InquiryFilter::All).len(), 2);
    }
}

