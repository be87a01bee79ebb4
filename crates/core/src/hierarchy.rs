//! The Branch → Year → Subject content hierarchy.
//!
//! A [`Branch`] is a single document that exclusively owns its years, each
//! year owns its subjects, and each subject owns its article and file posts.
//! Children are held by value in ordered `Vec`s (append order is preserved
//! and never rearranged) and located by id with the lookup helpers below.
//!
//! Every mutation here is pure: callers load a branch, mutate it in memory,
//! and persist the whole document back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{DbId, EmbeddedId, Timestamp};

// ---------------------------------------------------------------------------
// Year labels
// ---------------------------------------------------------------------------

/// One of the four fixed academic-year labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearLabel {
    First,
    Second,
    Third,
    Final,
}

impl YearLabel {
    pub const ALL: [YearLabel; 4] = [
        YearLabel::First,
        YearLabel::Second,
        YearLabel::Third,
        YearLabel::Final,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            YearLabel::First => "First",
            YearLabel::Second => "Second",
            YearLabel::Third => "Third",
            YearLabel::Final => "Final",
        }
    }
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YearLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown year label '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Post type discriminant carried by upload requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Article,
    File,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Article => "article",
            PostKind::File => "file",
        }
    }
}

impl FromStr for PostKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(PostKind::Article),
            "file" => Ok(PostKind::File),
            other => Err(CoreError::Validation(format!("Unknown post type '{other}'"))),
        }
    }
}

/// A text post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: EmbeddedId,
    pub body: String,
    pub posted_by_id: DbId,
    pub posted_by_name: String,
    pub posted_by_branch: String,
    pub created_at: Timestamp,
}

/// An uploaded file post. The bytes live on disk under `stored_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    pub id: EmbeddedId,
    /// Optional display text chosen by the uploader.
    pub display_name: Option<String>,
    pub stored_name: String,
    pub original_name: String,
    pub public_url: String,
    pub posted_by_id: DbId,
    pub posted_by_name: String,
    pub posted_by_branch: String,
    pub created_at: Timestamp,
}

/// The two post lists owned by a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Posts {
    pub articles: Vec<Article>,
    pub files: Vec<FileAsset>,
}

/// Who a new post is attributed to. `id` is the authenticated faculty id;
/// the name and branch are denormalized display fields.
#[derive(Debug, Clone)]
pub struct PostAuthor {
    pub id: DbId,
    pub name: String,
    pub branch: String,
}

/// Reference to a file that has already been written by the upload store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFileRef {
    pub stored_name: String,
    pub original_name: String,
    pub public_url: String,
}

/// Input for [`Branch::add_post`]. Which optional field is required depends
/// on `kind`.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub kind: PostKind,
    pub content: Option<String>,
    pub file: Option<StoredFileRef>,
    pub display_name: Option<String>,
    pub author: PostAuthor,
}

// ---------------------------------------------------------------------------
// Subjects, years, branches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EmbeddedId,
    pub name: String,
    pub created_by_id: DbId,
    #[serde(default)]
    pub posts: Posts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    pub id: EmbeddedId,
    pub label: YearLabel,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Year {
    /// A fresh year with no subjects.
    pub fn skeleton(label: YearLabel) -> Self {
        Self {
            id: Uuid::now_v7(),
            label,
            subjects: Vec::new(),
        }
    }

    /// Whether a subject with `name` exists, compared case-insensitively.
    pub fn has_subject_named(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.subjects.iter().any(|s| s.name.to_lowercase() == wanted)
    }

    pub fn subject(&self, subject_id: EmbeddedId) -> Result<&Subject, CoreError> {
        self.subjects
            .iter()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| CoreError::not_found("Subject", subject_id))
    }

    pub fn subject_mut(&mut self, subject_id: EmbeddedId) -> Result<&mut Subject, CoreError> {
        self.subjects
            .iter_mut()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| CoreError::not_found("Subject", subject_id))
    }
}

/// A branch document: the unit of persistence and of atomic update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: DbId,
    pub branch_name: String,
    pub years: Vec<Year>,
    /// Bumped by the store on every successful write.
    #[serde(skip)]
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Branch {
    pub fn year(&self, year_id: EmbeddedId) -> Result<&Year, CoreError> {
        self.years
            .iter()
            .find(|y| y.id == year_id)
            .ok_or_else(|| CoreError::not_found("Year", year_id))
    }

    pub fn year_mut(&mut self, year_id: EmbeddedId) -> Result<&mut Year, CoreError> {
        self.years
            .iter_mut()
            .find(|y| y.id == year_id)
            .ok_or_else(|| CoreError::not_found("Year", year_id))
    }

    /// Three-level lookup; the error names whichever level is missing.
    pub fn subject(
        &self,
        year_id: EmbeddedId,
        subject_id: EmbeddedId,
    ) -> Result<&Subject, CoreError> {
        self.year(year_id)?.subject(subject_id)
    }

    /// Both post lists of a subject, in append order.
    pub fn subject_content(
        &self,
        year_id: EmbeddedId,
        subject_id: EmbeddedId,
    ) -> Result<&Posts, CoreError> {
        Ok(&self.subject(year_id, subject_id)?.posts)
    }

    /// Append a new, empty subject to a year.
    ///
    /// Fails with `Conflict` if the year already holds a subject with the
    /// same name ignoring case. Returns the updated year.
    pub fn add_subject(
        &mut self,
        year_id: EmbeddedId,
        name: &str,
        created_by_id: DbId,
    ) -> Result<&Year, CoreError> {
        let name = name.trim();
        let year = self.year_mut(year_id)?;
        if year.has_subject_named(name) {
            return Err(CoreError::Conflict(
                "Subject already exists in this year".into(),
            ));
        }
        year.subjects.push(Subject {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_by_id,
            posts: Posts::default(),
        });
        Ok(year)
    }

    /// Append an article or file post to a subject.
    ///
    /// An article needs non-blank `content`; a file needs a `file` reference.
    /// Returns the updated subject.
    pub fn add_post(
        &mut self,
        year_id: EmbeddedId,
        subject_id: EmbeddedId,
        draft: PostDraft,
        now: Timestamp,
    ) -> Result<&Subject, CoreError> {
        let subject = self.year_mut(year_id)?.subject_mut(subject_id)?;
        let PostDraft {
            kind,
            content,
            file,
            display_name,
            author,
        } = draft;

        match kind {
            PostKind::Article => {
                let body = content
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| {
                        CoreError::Validation("Content is required for article".into())
                    })?;
                subject.posts.articles.push(Article {
                    id: Uuid::now_v7(),
                    body,
                    posted_by_id: author.id,
                    posted_by_name: author.name,
                    posted_by_branch: author.branch,
                    created_at: now,
                });
            }
            PostKind::File => {
                let file =
                    file.ok_or_else(|| CoreError::Validation("File is required".into()))?;
                subject.posts.files.push(FileAsset {
                    id: Uuid::now_v7(),
                    display_name,
                    stored_name: file.stored_name,
                    original_name: file.original_name,
                    public_url: file.public_url,
                    posted_by_id: author.id,
                    posted_by_name: author.name,
                    posted_by_branch: author.branch,
                    created_at: now,
                });
            }
        }
        Ok(subject)
    }
}

// ---------------------------------------------------------------------------
// Author scan
// ---------------------------------------------------------------------------

/// Posts by one author under a single (branch, year, subject).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPosts {
    pub branch_name: String,
    pub year: YearLabel,
    pub subject: String,
    pub articles: Vec<Article>,
    pub files: Vec<FileAsset>,
}

/// Collect every post attributed to `author_id`, grouped by subject.
///
/// Full scan over all branches: O(total posts). Subjects with no matching
/// posts are omitted; groups follow storage order.
pub fn posts_by_author(branches: &[Branch], author_id: DbId) -> Vec<AuthorPosts> {
    let mut results = Vec::new();
    for branch in branches {
        for year in &branch.years {
            for subject in &year.subjects {
                let articles: Vec<Article> = subject
                    .posts
                    .articles
                    .iter()
                    .filter(|a| a.posted_by_id == author_id)
                    .cloned()
                    .collect();
                let files: Vec<FileAsset> = subject
                    .posts
                    .files
                    .iter()
                    .filter(|f| f.posted_by_id == author_id)
                    .cloned()
                    .collect();

                if articles.is_empty() && files.is_empty() {
                    continue;
                }
                results.push(AuthorPosts {
                    branch_name: branch.branch_name.clone(),
                    year: year.label,
                    subject: subject.name.clone(),
                    articles,
                    files,
                });
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn branch(name: &str, labels: &[YearLabel]) -> Branch {
        let now = Utc::now();
        Branch {
            id: 1,
            branch_name: name.to_string(),
            years: labels.iter().copied().map(Year::skeleton).collect(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn author(id: DbId) -> PostAuthor {
        PostAuthor {
            id,
            name: format!("Faculty {id}"),
            branch: "CS".to_string(),
        }
    }

    fn article(id: DbId, body: &str) -> PostDraft {
        PostDraft {
            kind: PostKind::Article,
            content: Some(body.to_string()),
            file: None,
            display_name: None,
            author: author(id),
        }
    }

    fn file(id: DbId, stored: &str) -> PostDraft {
        PostDraft {
            kind: PostKind::File,
            content: None,
            file: Some(StoredFileRef {
                stored_name: stored.to_string(),
                original_name: "notes.pdf".to_string(),
                public_url: format!("http://localhost:3000/uploads/{stored}"),
            }),
            display_name: Some("Week 1 notes".to_string()),
            author: author(id),
        }
    }

    /// Branch with one subject under its first year; returns (branch, year, subject).
    fn seeded(subject: &str) -> (Branch, EmbeddedId, EmbeddedId) {
        let mut b = branch("CS", &[YearLabel::First]);
        let year_id = b.years[0].id;
        let subject_id = b.add_subject(year_id, subject, 7).unwrap().subjects[0].id;
        (b, year_id, subject_id)
    }

    #[test]
    fn year_label_parses_exact_names_only() {
        assert_eq!("Final".parse::<YearLabel>().unwrap(), YearLabel::Final);
        assert!("final".parse::<YearLabel>().is_err());
        assert_eq!(YearLabel::Third.to_string(), "Third");
    }

    #[test]
    fn add_subject_appends_with_empty_posts() {
        let (b, year_id, subject_id) = seeded("Algorithms");
        let subject = b.subject(year_id, subject_id).unwrap();
        assert_eq!(subject.name, "Algorithms");
        assert_eq!(subject.created_by_id, 7);
        assert_eq!(subject.posts, Posts::default());
    }

    #[test]
    fn add_subject_rejects_case_insensitive_duplicate() {
        let (mut b, year_id, _) = seeded("Thermodynamics");
        let err = b.add_subject(year_id, "thermodynamics", 8).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(b.years[0].subjects.len(), 1);
    }

    #[test]
    fn same_subject_name_allowed_in_other_year() {
        let mut b = branch("ME", &[YearLabel::First, YearLabel::Second]);
        let (first, second) = (b.years[0].id, b.years[1].id);
        b.add_subject(first, "Statics", 1).unwrap();
        assert!(b.add_subject(second, "Statics", 1).is_ok());
    }

    #[test]
    fn add_subject_unknown_year_is_not_found() {
        let mut b = branch("CS", &[YearLabel::First]);
        let err = b.add_subject(Uuid::now_v7(), "Algorithms", 1).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Year", .. });
    }

    #[test]
    fn subject_content_reports_missing_level() {
        let (b, year_id, _) = seeded("Algorithms");
        let err = b.subject_content(year_id, Uuid::now_v7()).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Subject", .. });
        let err = b.subject_content(Uuid::now_v7(), Uuid::now_v7()).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Year", .. });
    }

    #[test]
    fn posts_are_returned_in_append_order() {
        let (mut b, year_id, subject_id) = seeded("Algorithms");
        let now = Utc::now();
        b.add_post(year_id, subject_id, article(1, "first"), now).unwrap();
        b.add_post(year_id, subject_id, file(2, "a.pdf"), now).unwrap();
        b.add_post(year_id, subject_id, article(2, "second"), now).unwrap();
        b.add_post(year_id, subject_id, file(1, "b.pdf"), now).unwrap();

        let posts = b.subject_content(year_id, subject_id).unwrap();
        let bodies: Vec<&str> = posts.articles.iter().map(|a| a.body.as_str()).collect();
        let stored: Vec<&str> = posts.files.iter().map(|f| f.stored_name.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(stored, vec!["a.pdf", "b.pdf"]);
        assert_eq!(posts.files[0].display_name.as_deref(), Some("Week 1 notes"));
    }

    #[test]
    fn article_requires_content() {
        let (mut b, year_id, subject_id) = seeded("Algorithms");
        let mut draft = article(1, "   ");
        let err = b.add_post(year_id, subject_id, draft.clone(), Utc::now()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("Content"));

        draft.content = None;
        assert!(b.add_post(year_id, subject_id, draft, Utc::now()).is_err());
        assert!(b.years[0].subjects[0].posts.articles.is_empty());
    }

    #[test]
    fn file_requires_stored_reference() {
        let (mut b, year_id, subject_id) = seeded("Algorithms");
        let mut draft = file(1, "x.pdf");
        draft.file = None;
        let err = b.add_post(year_id, subject_id, draft, Utc::now()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "File is required");
    }

    #[test]
    fn posts_by_author_groups_per_subject() {
        let (mut cs, year_id, algo) = seeded("Algorithms");
        let os = cs.add_subject(year_id, "Operating Systems", 7).unwrap().subjects[1].id;
        let now = Utc::now();
        cs.add_post(year_id, algo, article(1, "intro notes"), now).unwrap();
        cs.add_post(year_id, algo, article(2, "someone else"), now).unwrap();
        cs.add_post(year_id, os, article(2, "not mine"), now).unwrap();

        let mut ee = branch("EE", &[YearLabel::Final]);
        let ee_year = ee.years[0].id;
        let circuits = ee.add_subject(ee_year, "Circuits", 1).unwrap().subjects[0].id;
        ee.add_post(ee_year, circuits, file(1, "c.pdf"), now).unwrap();

        let groups = posts_by_author(&[cs, ee], 1);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].branch_name, "CS");
        assert_eq!(groups[0].year, YearLabel::First);
        assert_eq!(groups[0].subject, "Algorithms");
        assert_eq!(groups[0].articles.len(), 1);
        assert_eq!(groups[0].articles[0].body, "intro notes");
        assert!(groups[0].files.is_empty());

        assert_eq!(groups[1].branch_name, "EE");
        assert_eq!(groups[1].year, YearLabel::Final);
        assert_eq!(groups[1].files[0].stored_name, "c.pdf");
    }

    #[test]
    fn posts_by_unknown_author_is_empty() {
        let (mut b, year_id, subject_id) = seeded("Algorithms");
        b.add_post(year_id, subject_id, article(1, "hello"), Utc::now()).unwrap();
        assert!(posts_by_author(&[b], 99).is_empty());
    }

    #[test]
    fn year_document_round_trips_through_json() {
        let (mut b, year_id, subject_id) = seeded("Algorithms");
        b.add_post(year_id, subject_id, article(1, "hello"), Utc::now()).unwrap();

        let json = serde_json::to_value(&b.years).unwrap();
        assert_eq!(json[0]["label"], "First");
        assert_eq!(json[0]["subjects"][0]["createdById"], 7);
        assert_eq!(json[0]["subjects"][0]["posts"]["articles"][0]["postedById"], 1);

        let back: Vec<Year> = serde_json::from_value(json).unwrap();
        assert_eq!(back, b.years);
    }
}
