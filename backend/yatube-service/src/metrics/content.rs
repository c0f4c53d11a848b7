use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Post writes segmented by operation (create, update).
    pub static ref POST_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_post_writes_total",
        "Successful post writes segmented by operation",
        &["operation"]
    )
    .expect("failed to register yatube_post_writes_total");

    /// Comments stored.
    pub static ref COMMENTS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_comments_created_total",
        "Comments stored segmented by outcome",
        &["result"]
    )
    .expect("failed to register yatube_comments_created_total");

    /// Follow edge changes (follow, unfollow) that actually changed state.
    pub static ref FOLLOW_CHANGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_follow_changes_total",
        "Follow edges added or removed",
        &["action"]
    )
    .expect("failed to register yatube_follow_changes_total");

    /// Form submissions rejected by validation, by form.
    pub static ref FORM_REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_form_rejections_total",
        "Form submissions re-rendered with errors",
        &["form"]
    )
    .expect("failed to register yatube_form_rejections_total");
}
