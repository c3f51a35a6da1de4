//! Building the live row for a promoted profile

use approval_types::{ApprovalRecord, ApprovalStatus, LiveRecord, ProfileFields, Rating};
use chrono::{DateTime, Utc};

/// Copy an approval row into its live form.
///
/// `created_at` is kept from the submission, `updated_at` and `approved_at`
/// are stamped with `now`. Startup and incubation rows keep their rating,
/// replaced by `rating` when one is given; the other roles never carry one.
pub fn build_live_record(
    approval: &ApprovalRecord,
    rating: Option<Rating>,
    now: DateTime<Utc>,
) -> LiveRecord {
    let rating = match &approval.profile {
        ProfileFields::Startup(_) | ProfileFields::Incubation(_) => rating.or(approval.rating),
        ProfileFields::Investor(_) | ProfileFields::Mentor(_) => None,
    };

    LiveRecord {
        id: approval.id.clone(),
        user_id: approval.user_id.clone(),
        profile: approval.profile.clone(),
        status: ApprovalStatus::Approved,
        rating,
        created_at: approval.created_at,
        updated_at: now,
        approved_at: now,
    }
}
