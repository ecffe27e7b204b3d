//! Text rendering for tool results
//!
//! Every tool answers with a single human-readable text block. The functions
//! here are pure so the layout can be tested without a tracker.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::redmine::types::{Issue, IssueStatus, NewIssue, NewTimeEntry, TimeEntry, User};

/// Descriptions longer than this many characters are cut
pub const DESCRIPTION_LIMIT: usize = 500;

const NOT_AVAILABLE: &str = "N/A";

/// Round an hour amount to hundredths
pub fn round_hours(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an hour amount, rounded to two decimals
pub fn hours(value: f64) -> String {
    let rounded = round_hours(value);
    // Avoid printing "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Sum of `hours` across entries
pub fn total_hours<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    entries.into_iter().map(|e| e.hours).sum()
}

/// Group entries by `spent_on`; keys iterate in ascending date order
pub fn group_by_date(entries: &[TimeEntry]) -> BTreeMap<&str, Vec<&TimeEntry>> {
    let mut groups: BTreeMap<&str, Vec<&TimeEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.spent_on.as_str()).or_default().push(entry);
    }
    groups
}

/// Cut a description to [`DESCRIPTION_LIMIT`] characters, appending `...`
pub fn truncate_description(description: &str) -> Cow<'_, str> {
    match description.char_indices().nth(DESCRIPTION_LIMIT) {
        None => Cow::Borrowed(description),
        Some((cut, _)) => Cow::Owned(format!("{}...", &description[..cut])),
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn entry_line(entry: &TimeEntry) -> String {
    let issue = entry
        .issue
        .as_ref()
        .map(|i| i.id.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let comment = entry
        .comments
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("No comment");

    format!("#{}: {}h ({})", issue, hours(entry.hours), comment)
}

/// `list_my_tasks`
pub fn issue_list(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "📭 No tasks found.".to_string();
    }

    let mut text = format!("📋 Tasks ({}):\n\n", issues.len());
    for issue in issues {
        let status = issue.status.as_ref().map(|s| s.name.as_str());
        let project = issue.project.as_ref().map(|p| p.name.as_str());

        text.push_str(&format!(
            "- #{} [{}] {}%: {}\n",
            issue.id,
            or_na(status),
            issue.done_ratio.unwrap_or(0),
            issue.subject
        ));
        text.push_str(&format!(
            "  (Due: {} | Project: {})\n",
            or_na(issue.due_date.as_deref()),
            or_na(project)
        ));
    }
    text
}

/// `get_issue_details`
pub fn issue_details(issue: &Issue) -> String {
    let name = |r: &Option<crate::redmine::types::NamedRef>| {
        r.as_ref()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let mut text = format!("#{} - {}\n\n", issue.id, issue.subject);
    text.push_str(&format!("Project:    {}\n", name(&issue.project)));
    text.push_str(&format!("Status:     {}\n", name(&issue.status)));
    text.push_str(&format!("Progress:   {}%\n", issue.done_ratio.unwrap_or(0)));
    text.push_str(&format!("Assigned:   {}\n", name(&issue.assigned_to)));
    text.push_str(&format!("Start date: {}\n", or_na(issue.start_date.as_deref())));
    text.push_str(&format!("Due date:   {}\n", or_na(issue.due_date.as_deref())));
    text.push_str(&format!(
        "Spent:      {}h / Est: {}h\n",
        hours(issue.spent_hours.unwrap_or(0.0)),
        issue
            .estimated_hours
            .map(hours)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));

    if let Some(parent) = &issue.parent {
        text.push_str(&format!("\nParent:     #{}\n", parent.id));
    }

    if !issue.children.is_empty() {
        text.push_str(&format!("\nSubtasks ({}):\n", issue.children.len()));
        for child in &issue.children {
            text.push_str(&format!("  - #{}: {}\n", child.id, child.subject));
        }
    }

    if let Some(description) = issue.description.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(&format!("\nDescription:\n{}\n", truncate_description(description)));
    }

    let notes: Vec<_> = issue
        .journals
        .iter()
        .filter_map(|j| {
            j.notes
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .map(|n| (j, n))
        })
        .collect();
    if !notes.is_empty() {
        text.push_str(&format!("\nHistory ({} notes):\n", notes.len()));
        for (journal, note) in notes {
            let author = journal
                .user
                .as_ref()
                .map(|u| u.name.as_str())
                .unwrap_or("Unknown");
            match journal.created_on.as_deref() {
                Some(at) => text.push_str(&format!("  - [{}] {}: {}\n", at, author, note)),
                None => text.push_str(&format!("  - {}: {}\n", author, note)),
            }
        }
    }

    text
}

/// `log_time`
pub fn time_logged(entry: &NewTimeEntry, activity: &str, process: &str) -> String {
    let mut text = format!(
        "✅ Logged {}h on task #{}\n",
        hours(entry.hours),
        entry.issue_id
    );
    if let Some(comment) = &entry.comments {
        text.push_str(&format!("   Comment: {}\n", comment));
    }
    text.push_str(&format!("   Activity: {} ({})\n", activity, entry.activity_id));
    text.push_str(&format!("   Process: {}\n", process));
    text.push_str(&format!("   Date: {}", entry.spent_on));
    text
}

/// `update_issue_status`
pub fn status_updated(issue_id: u32, status_id: u32) -> String {
    format!("✅ Updated task #{} status to {}", issue_id, status_id)
}

/// `update_progress`
pub fn progress_updated(issue_id: u32, percent: u8) -> String {
    format!("✅ Updated task #{} to {}%", issue_id, percent)
}

/// `add_note`
pub fn note_added(issue_id: u32) -> String {
    format!("✅ Added note to task #{}", issue_id)
}

/// `get_today_logs`: entries, total, and the gap to `target_hours`
pub fn today_logs(today: &str, entries: &[TimeEntry], target_hours: f64) -> String {
    // Compare what is displayed, not the raw float sum
    let total = round_hours(total_hours(entries));

    let mut text = format!("📅 Time log for today ({}):\n\n", today);
    for entry in entries {
        text.push_str(&format!("- {}\n", entry_line(entry)));
    }

    text.push_str(&format!("\n⏱️  Total: {}h\n", hours(total)));
    if total < target_hours {
        text.push_str(&format!(
            "⚠️  Need {}h more to reach {}h.\n",
            hours(target_hours - total),
            hours(target_hours)
        ));
    } else {
        text.push_str("✅ Logged enough hours!\n");
    }
    text
}

/// `get_time_logs_range`: entries grouped per day in date order
pub fn time_logs_range(from: &str, to: &str, entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return format!("📭 No time logs from {} to {}", from, to);
    }

    let mut text = format!("📅 Time logs from {} to {}:\n\n", from, to);
    for (date, day_entries) in group_by_date(entries) {
        let day_total = total_hours(day_entries.iter().copied());
        text.push_str(&format!("\n[{}] - {}h:\n", date, hours(day_total)));
        for entry in day_entries {
            text.push_str(&format!("  - {}\n", entry_line(entry)));
        }
    }

    text.push_str(&format!("\n⏱️  Total: {}h\n", hours(total_hours(entries))));
    text
}

/// `list_statuses`
pub fn statuses(statuses: &[IssueStatus]) -> String {
    let mut text = "📊 Available Statuses:\n\n".to_string();
    for status in statuses {
        let state = if status.is_closed {
            "✅ (Closed)"
        } else {
            "⏳ (Open)"
        };
        text.push_str(&format!("- #{}: {} {}\n", status.id, status.name, state));
    }
    text
}

/// `create_issue`: the new id plus the optional fields that were sent
pub fn created_issue(issue: &Issue, request: &NewIssue) -> String {
    let subject = if issue.subject.is_empty() {
        &request.subject
    } else {
        &issue.subject
    };

    let mut text = format!("✅ Created issue #{}\n", issue.id);
    text.push_str(&format!("   Subject: {}\n", subject));
    if let Some(parent) = request.parent_issue_id {
        text.push_str(&format!("   Parent: #{}\n", parent));
    }
    if let Some(user) = request.assigned_to_id {
        text.push_str(&format!("   Assigned to: User #{}\n", user));
    }
    if let Some(estimate) = request.estimated_hours {
        text.push_str(&format!("   Estimated: {}h\n", hours(estimate)));
    }
    if let Some(start) = &request.start_date {
        text.push_str(&format!("   Start: {}\n", start));
    }
    if let Some(due) = &request.due_date {
        text.push_str(&format!("   Due: {}\n", due));
    }
    text
}

/// `get_user_info`
pub fn user_info(user: &User) -> String {
    let mut text = "👤 User Information:\n\n".to_string();
    text.push_str(&format!("ID: {}\n", user.id));
    text.push_str(&format!("Username: {}\n", or_na(user.login.as_deref())));
    text.push_str(&format!("Name: {} {}\n", user.firstname, user.lastname));
    text.push_str(&format!("Email: {}\n", or_na(user.mail.as_deref())));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redmine::types::{ChildIssue, IssueRef, Journal, NamedRef};

    fn entry(id: u32, issue: Option<u32>, hours: f64, spent_on: &str, comment: Option<&str>) -> TimeEntry {
        TimeEntry {
            id,
            issue: issue.map(|id| IssueRef { id }),
            activity: None,
            hours,
            comments: comment.map(str::to_string),
            spent_on: spent_on.to_string(),
        }
    }

    fn issue(id: u32, subject: &str) -> Issue {
        Issue {
            id,
            subject: subject.to_string(),
            project: Some(NamedRef { id: 1, name: "Website".to_string() }),
            tracker: None,
            status: Some(NamedRef { id: 2, name: "In Progress".to_string() }),
            priority: None,
            assigned_to: None,
            parent: None,
            description: None,
            start_date: None,
            due_date: Some("2024-06-30".to_string()),
            done_ratio: Some(40),
            estimated_hours: None,
            spent_hours: None,
            children: vec![],
            journals: vec![],
        }
    }

    #[test]
    fn test_hours_rendering() {
        assert_eq!(hours(8.0), "8");
        assert_eq!(hours(1.5), "1.5");
        assert_eq!(hours(0.1 + 0.2), "0.3");
        assert_eq!(hours(8.0 - 7.3), "0.7");
        assert_eq!(hours(-0.0), "0");
    }

    #[test]
    fn test_short_description_unchanged() {
        let text = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&text), text.as_str());
    }

    #[test]
    fn test_long_description_truncated() {
        let text = "b".repeat(DESCRIPTION_LIMIT + 1);
        let cut = truncate_description(&text);
        assert_eq!(cut.len(), DESCRIPTION_LIMIT + 3);
        assert!(cut.ends_with("b..."));
        assert_eq!(&cut[..DESCRIPTION_LIMIT], &text[..DESCRIPTION_LIMIT]);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let text = "é".repeat(DESCRIPTION_LIMIT + 10);
        let cut = truncate_description(&text);
        assert_eq!(cut.chars().count(), DESCRIPTION_LIMIT + 3);
    }

    #[test]
    fn test_issue_list_empty() {
        assert_eq!(issue_list(&[]), "📭 No tasks found.");
    }

    #[test]
    fn test_issue_list_lines() {
        let text = issue_list(&[issue(42, "Fix login")]);
        assert!(text.starts_with("📋 Tasks (1):"));
        assert!(text.contains("- #42 [In Progress] 40%: Fix login\n"));
        assert!(text.contains("  (Due: 2024-06-30 | Project: Website)\n"));
    }

    #[test]
    fn test_issue_details_sections() {
        let mut i = issue(42, "Fix login");
        i.parent = Some(IssueRef { id: 40 });
        i.children = vec![ChildIssue { id: 43, subject: "Write tests".to_string() }];
        i.description = Some("x".repeat(600));
        i.journals = vec![
            Journal { id: 1, user: Some(NamedRef { id: 5, name: "Jane".to_string() }), notes: Some("Looks good".to_string()), created_on: None },
            Journal { id: 2, user: None, notes: Some(String::new()), created_on: None },
        ];

        let text = issue_details(&i);
        assert!(text.starts_with("#42 - Fix login\n\n"));
        assert!(text.contains("Assigned:   N/A\n"));
        assert!(text.contains("Spent:      0h / Est: N/Ah\n"));
        assert!(text.contains("\nParent:     #40\n"));
        assert!(text.contains("Subtasks (1):\n  - #43: Write tests\n"));
        assert!(text.contains(&format!("\nDescription:\n{}...\n", "x".repeat(500))));
        assert!(text.contains("History (1 notes):\n  - Jane: Looks good\n"));
    }

    #[test]
    fn test_today_logs_warns_below_target() {
        let entries = vec![
            entry(1, Some(10), 2.5, "2024-06-03", Some("Coding")),
            entry(2, None, 3.0, "2024-06-03", None),
        ];
        let text = today_logs("2024-06-03", &entries, 8.0);

        assert!(text.contains("- #10: 2.5h (Coding)\n"));
        assert!(text.contains("- #N/A: 3h (No comment)\n"));
        assert!(text.contains("⏱️  Total: 5.5h\n"));
        assert!(text.contains("⚠️  Need 2.5h more to reach 8h.\n"));
        assert!(!text.contains("Logged enough"));
    }

    #[test]
    fn test_today_logs_enough_hours() {
        let entries = vec![
            entry(1, Some(10), 4.0, "2024-06-03", None),
            entry(2, Some(11), 4.0, "2024-06-03", None),
        ];
        let text = today_logs("2024-06-03", &entries, 8.0);
        assert!(text.contains("Total: 8h"));
        assert!(text.contains("✅ Logged enough hours!"));
        assert!(!text.contains("Need"));
    }

    #[test]
    fn test_today_logs_float_sum_reaching_target() {
        let entries: Vec<TimeEntry> = [0.1, 0.2, 0.7, 2.4, 2.3, 2.3]
            .iter()
            .enumerate()
            .map(|(i, h)| entry(i as u32 + 1, Some(10), *h, "2024-06-03", None))
            .collect();
        let text = today_logs("2024-06-03", &entries, 8.0);
        assert!(text.contains("⏱️  Total: 8h\n"));
        assert!(text.contains("✅ Logged enough hours!"));
        assert!(!text.contains("Need"));
    }

    #[test]
    fn test_today_logs_empty() {
        let text = today_logs("2024-06-03", &[], 8.0);
        assert!(text.contains("Total: 0h"));
        assert!(text.contains("Need 8h more to reach 8h."));
    }

    #[test]
    fn test_range_groups_in_date_order() {
        let entries = vec![
            entry(1, Some(10), 1.0, "2024-06-05", None),
            entry(2, Some(11), 2.0, "2024-06-03", None),
            entry(3, Some(12), 0.5, "2024-06-05", None),
            entry(4, Some(13), 3.0, "2024-06-04", None),
        ];
        let text = time_logs_range("2024-06-01", "2024-06-07", &entries);

        let d3 = text.find("[2024-06-03] - 2h:").unwrap();
        let d4 = text.find("[2024-06-04] - 3h:").unwrap();
        let d5 = text.find("[2024-06-05] - 1.5h:").unwrap();
        assert!(d3 < d4 && d4 < d5);
        assert!(text.ends_with("\n⏱️  Total: 6.5h\n"));
    }

    #[test]
    fn test_range_empty() {
        assert_eq!(
            time_logs_range("2024-06-01", "2024-06-07", &[]),
            "📭 No time logs from 2024-06-01 to 2024-06-07"
        );
    }

    #[test]
    fn test_statuses() {
        let text = statuses(&[
            IssueStatus { id: 1, name: "New".to_string(), is_closed: false },
            IssueStatus { id: 5, name: "Closed".to_string(), is_closed: true },
        ]);
        assert!(text.contains("- #1: New ⏳ (Open)\n"));
        assert!(text.contains("- #5: Closed ✅ (Closed)\n"));
    }

    #[test]
    fn test_created_issue_lists_sent_fields() {
        let request = NewIssue {
            project_id: 1,
            subject: "Subtask".to_string(),
            parent_issue_id: Some(42),
            due_date: Some("2024-07-01".to_string()),
            ..Default::default()
        };
        let text = created_issue(&issue(99, "Subtask"), &request);
        assert!(text.starts_with("✅ Created issue #99\n"));
        assert!(text.contains("   Parent: #42\n"));
        assert!(text.contains("   Due: 2024-07-01\n"));
        assert!(!text.contains("Assigned to"));
    }

    #[test]
    fn test_user_info() {
        let user = User {
            id: 5,
            login: Some("jdoe".to_string()),
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            mail: None,
        };
        let text = user_info(&user);
        assert!(text.contains("Username: jdoe\n"));
        assert!(text.contains("Name: Jane Doe\n"));
        assert!(text.contains("Email: N/A\n"));
    }
}
