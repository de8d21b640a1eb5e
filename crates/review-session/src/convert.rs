//! Conversions between platform DTOs and the engine's domain models
//!
//! The client crate speaks the platform's wire shapes; everything above
//! it works on `review-diff` models. This module is the only place the
//! two meet.

use review_client::types::ReviewComment as WireComment;
use review_client::types::ReviewEvent as WireEvent;
use review_client::types::{ChangeStatus, ChangedFile, DraftComment};
use review_diff::{
    parse_file_patch, DiffSide, FileDiff, FileStatus, PendingComment, ReviewComment, ReviewDiff,
    ReviewEvent,
};

/// Convert a wire review comment into the domain model
pub fn comment_from_wire(wire: &WireComment) -> ReviewComment {
    ReviewComment {
        id: wire.id,
        path: wire.path.clone(),
        // Comments outdated by new pushes lose `line`; the original
        // anchor still identifies the spot
        line: wire.line.or(wire.original_line),
        position: wire.position,
        side: wire.side.as_deref().and_then(DiffSide::parse),
        body: wire.body.clone(),
        author: wire.author.clone(),
        created_at: wire.created_at,
    }
}

/// Convert a drafted comment into the submission wire shape
pub fn draft_from_pending(pending: &PendingComment) -> DraftComment {
    let side = pending.position.side.as_str();
    DraftComment {
        path: pending.path.clone(),
        line: pending.position.line,
        side: side.to_string(),
        start_line: pending.position.start_line,
        start_side: pending.position.start_line.map(|_| side.to_string()),
        body: pending.body.clone(),
    }
}

/// Convert a domain review event into the wire enum
pub fn event_to_wire(event: ReviewEvent) -> WireEvent {
    match event {
        ReviewEvent::Approve => WireEvent::Approve,
        ReviewEvent::RequestChanges => WireEvent::RequestChanges,
        ReviewEvent::Comment => WireEvent::Comment,
    }
}

/// Map the platform's change status onto the diff model's status
///
/// Copies degrade to renames (both carry a previous path); statuses the
/// model doesn't distinguish degrade to modifications.
pub fn file_status_from_wire(status: ChangeStatus) -> FileStatus {
    match status {
        ChangeStatus::Added => FileStatus::Added,
        ChangeStatus::Removed => FileStatus::Removed,
        ChangeStatus::Modified => FileStatus::Modified,
        ChangeStatus::Renamed => FileStatus::Renamed,
        ChangeStatus::Copied => FileStatus::Renamed,
        ChangeStatus::Changed | ChangeStatus::Unknown => FileStatus::Modified,
    }
}

/// Parse one comparison entry into a file diff
pub fn file_diff_from_changed(file: &ChangedFile) -> FileDiff {
    parse_file_patch(
        file.path.clone(),
        file.previous_path.clone(),
        file_status_from_wire(file.status),
        file.patch.as_deref(),
    )
}

/// Build the complete diff of a change from its comparison entries
pub fn build_review_diff(
    base_ref: impl Into<String>,
    head_ref: impl Into<String>,
    files: &[ChangedFile],
) -> ReviewDiff {
    let mut diff = ReviewDiff::new(base_ref, head_ref);
    diff.files = files.iter().map(file_diff_from_changed).collect();
    diff.recalculate_totals();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use review_diff::CommentPosition;

    fn wire_comment(line: Option<u32>, original_line: Option<u32>, side: Option<&str>) -> WireComment {
        WireComment {
            id: 1,
            path: "src/lib.rs".to_string(),
            line,
            original_line,
            position: None,
            side: side.map(str::to_string),
            body: "body".to_string(),
            author: "octocat".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_comment_from_wire_parses_side() {
        let comment = comment_from_wire(&wire_comment(Some(3), None, Some("LEFT")));
        assert_eq!(comment.side, Some(DiffSide::Left));
        assert_eq!(comment.line, Some(3));

        let comment = comment_from_wire(&wire_comment(Some(3), None, Some("sideways")));
        assert_eq!(comment.side, None);
    }

    #[test]
    fn test_comment_from_wire_recovers_outdated_line() {
        let comment = comment_from_wire(&wire_comment(None, Some(17), Some("RIGHT")));
        assert_eq!(comment.line, Some(17));
    }

    #[test]
    fn test_draft_from_pending_multiline_mirrors_side() {
        let pending = PendingComment::new(
            "src/main.rs",
            CommentPosition::range(DiffSide::Right, 4, 9),
            "extract this",
        );
        let draft = draft_from_pending(&pending);
        assert_eq!(draft.line, 9);
        assert_eq!(draft.start_line, Some(4));
        assert_eq!(draft.side, "RIGHT");
        assert_eq!(draft.start_side.as_deref(), Some("RIGHT"));

        let single = PendingComment::new(
            "src/main.rs",
            CommentPosition::single(DiffSide::Left, 2),
            "why remove?",
        );
        let draft = draft_from_pending(&single);
        assert_eq!(draft.start_line, None);
        assert_eq!(draft.start_side, None);
    }

    #[test]
    fn test_file_status_mapping() {
        assert_eq!(
            file_status_from_wire(ChangeStatus::Copied),
            FileStatus::Renamed
        );
        assert_eq!(
            file_status_from_wire(ChangeStatus::Changed),
            FileStatus::Modified
        );
        assert_eq!(
            file_status_from_wire(ChangeStatus::Unknown),
            FileStatus::Modified
        );
        assert_eq!(file_status_from_wire(ChangeStatus::Added), FileStatus::Added);
    }

    #[test]
    fn test_build_review_diff_totals() {
        let files = vec![
            ChangedFile {
                path: "a.rs".to_string(),
                previous_path: None,
                status: ChangeStatus::Modified,
                additions: 1,
                deletions: 1,
                patch: Some("@@ -1 +1 @@\n-old\n+new".to_string()),
            },
            ChangedFile {
                path: "logo.png".to_string(),
                previous_path: None,
                status: ChangeStatus::Modified,
                additions: 0,
                deletions: 0,
                patch: None,
            },
        ];

        let diff = build_review_diff("main", "feature/y", &files);
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.total_additions, 1);
        assert_eq!(diff.total_deletions, 1);
        assert!(diff.files[1].is_binary);
        assert!(diff.files[1].hunks.is_empty());
    }
}
