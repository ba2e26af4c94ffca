use std::sync::Arc;

use chrono::Utc;

use crate::store::{InterleavedStore, MemoryRecordStore};
use crate::workflows::enquiries::{
    Enquiry, EnquiryDraft, EnquiryId, EnquiryPatch, EnquiryRepository, EnquiryService,
    EnquiryServiceError, FollowUpNote,
};
use crate::workflows::placement::{NewPlacement, PlacementRepository};

fn service() -> EnquiryService<MemoryRecordStore> {
    EnquiryService::new(Arc::new(MemoryRecordStore::default()))
}

fn draft(name: &str, cost: i64, paid: i64, discount: i64) -> EnquiryDraft {
    EnquiryDraft {
        name: Some(name.to_string()),
        phone: Some("+91 98765 43210".to_string()),
        package_cost: Some(cost),
        amount_paid: Some(paid),
        discount: Some(discount),
        ..EnquiryDraft::default()
    }
}

fn note(text: &str) -> FollowUpNote {
    FollowUpNote {
        note: Some(text.to_string()),
    }
}

#[test]
fn seventh_enquiry_balance_follows_payment_update() {
    let service = service();
    for index in 1..=6 {
        service
            .create(draft(&format!("Student {index}"), 5_000, 1_000, 0))
            .expect("seed enquiry");
    }
    let seventh = service
        .create(draft("Student 7", 10_000, 4_000, 500))
        .expect("seventh enquiry");
    assert_eq!(seventh.id, EnquiryId(7));
    assert_eq!(seventh.fees.balance_amount(), 5_500);

    let updated = service
        .update(
            seventh.id,
            EnquiryPatch {
                amount_paid: Some(6_000),
                ..EnquiryPatch::default()
            },
        )
        .expect("payment recorded");
    assert_eq!(updated.fees.balance_amount(), 3_500);

    let stored = service.get(seventh.id).expect("stored enquiry");
    assert_eq!(stored.fees.balance_amount(), 3_500);
    assert_eq!(service.list().expect("list").len(), 7);
}

#[test]
fn update_without_fee_inputs_keeps_balance() {
    let service = service();
    let created = service.create(draft("Asha Rao", 12_000, 2_000, 0)).expect("created");

    let updated = service
        .update(
            created.id,
            EnquiryPatch {
                batch_code: Some(Some("DE-24".to_string())),
                ..EnquiryPatch::default()
            },
        )
        .expect("updated");

    assert_eq!(updated.fees.balance_amount(), 10_000);
    assert_eq!(updated.batch_code.as_deref(), Some("DE-24"));
}

#[test]
fn invalid_update_leaves_record_untouched() {
    let service = service();
    let created = service.create(draft("Asha Rao", 12_000, 2_000, 0)).expect("created");

    let error = service
        .update(
            created.id,
            EnquiryPatch {
                amount_paid: Some(-1),
                email: Some(Some("not-an-email".to_string())),
                ..EnquiryPatch::default()
            },
        )
        .expect_err("invalid patch");

    let errors = match error {
        EnquiryServiceError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert!(errors.get("amount_paid").is_some());
    assert!(errors.get("email").is_some());
    assert_eq!(service.get(created.id).expect("stored"), created);
}

#[test]
fn update_of_unknown_enquiry_is_not_found() {
    let error = service()
        .update(EnquiryId(99), EnquiryPatch::default())
        .expect_err("missing enquiry");
    assert!(matches!(error, EnquiryServiceError::NotFound(EnquiryId(99))));
}

#[test]
fn follow_ups_fill_five_slots_then_reject() {
    let service = service();
    let created = service.create(draft("Asha Rao", 0, 0, 0)).expect("created");

    for call in 1..=5 {
        let enquiry = service
            .record_follow_up(created.id, note(&format!("call {call}")))
            .expect("slot available");
        assert_eq!(enquiry.follow_ups.len(), call);
    }

    let error = service
        .record_follow_up(created.id, note("call 6"))
        .expect_err("no slot left");
    let errors = match error {
        EnquiryServiceError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(
        errors.messages("follow_ups"),
        vec!["All 5 follow-up calls are already recorded."]
    );
    assert_eq!(
        service.get(created.id).expect("stored").follow_ups.last().map(String::as_str),
        Some("call 5")
    );
}

#[test]
fn blank_follow_up_note_is_rejected() {
    let service = service();
    let created = service.create(draft("Asha Rao", 0, 0, 0)).expect("created");

    let error = service
        .record_follow_up(created.id, note("   "))
        .expect_err("blank note");
    assert!(matches!(error, EnquiryServiceError::Validation(_)));

    let error = service
        .record_follow_up(created.id, FollowUpNote::default())
        .expect_err("missing note");
    let errors = match error {
        EnquiryServiceError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.messages("note"), vec!["This field is required."]);
}

#[test]
fn null_clears_email_and_leaves_unnamed_fields() {
    let service = service();
    let mut draft = draft("Asha Rao", 12_000, 2_000, 0);
    draft.email = Some("asha@example.com".to_string());
    draft.batch_code = Some("DE-24".to_string());
    let created = service.create(draft).expect("created");

    let patch: EnquiryPatch =
        serde_json::from_value(serde_json::json!({ "email": null })).expect("patch decodes");
    let updated = service.update(created.id, patch).expect("updated");

    assert_eq!(updated.email, None);
    assert_eq!(updated.batch_code.as_deref(), Some("DE-24"));
    assert_eq!(updated.fees.balance_amount(), 10_000);
}

fn placement_for(enquiry: EnquiryId) -> NewPlacement {
    NewPlacement {
        enquiry,
        full_name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        email: "asha@example.com".to_string(),
        course: "Data Engineering".to_string(),
        location_current: None,
        consent: true,
        experiences: Vec::new(),
        submitted_at: Utc::now(),
    }
}

#[test]
fn update_does_not_reopen_link_closed_by_a_concurrent_submission() {
    let store = Arc::new(InterleavedStore::default());
    let service = EnquiryService::new(Arc::clone(&store));
    let created = service.create(draft("Asha Rao", 12_000, 2_000, 0)).expect("created");

    let id = created.id;
    store.after_next_read(move |inner| {
        inner.submit_placement(placement_for(id)).expect("placement submitted");
    });
    let updated = service
        .update(
            id,
            EnquiryPatch {
                amount_paid: Some(4_000),
                ..EnquiryPatch::default()
            },
        )
        .expect("payment recorded");

    assert!(!updated.link_active);
    assert_eq!(updated.fees.balance_amount(), 8_000);
    let stored: Enquiry = store.fetch_enquiry(id).expect("fetch").expect("enquiry exists");
    assert!(!stored.link_active);
    assert!(store.placement_for_enquiry(id).expect("lookup").is_some());
}

#[test]
fn concurrent_follow_ups_keep_every_note_up_to_the_limit() {
    let service = Arc::new(service());
    let id = service.create(draft("Asha Rao", 0, 0, 0)).expect("created").id;

    let handles: Vec<_> = (0..10)
        .map(|call| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                service
                    .record_follow_up(id, note(&format!("call {call}")))
                    .is_ok()
            })
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .filter(|accepted| *accepted)
        .count();

    assert_eq!(accepted, 5);
    assert_eq!(service.get(id).expect("stored").follow_ups.len(), 5);
}
