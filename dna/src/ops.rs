use std::path::{Component, Path, PathBuf};

use regex::Regex;

use crate::config::{DnaConfig, SNP_FILE, SUBJECT_INFO_FILE, TEST_INFO_FILE};
use crate::error::QueryError;
use crate::input::RsidInput;
use crate::privacy;
use crate::results::{InfoResult, SnpQueryResult, SubjectList};
use crate::scan::scan;
use crate::store::SubjectStore;
use crate::store::fs::FsStore;

/// Optional metadata files kept next to a subject's marker file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoFile {
    /// `test_info.txt`: how the DNA test was performed.
    Test,
    /// `subject_info.txt`: who the subject is.
    Subject,
}

impl InfoFile {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Test => TEST_INFO_FILE,
            Self::Subject => SUBJECT_INFO_FILE,
        }
    }

    fn missing_hint(self, subject: &str) -> String {
        let purpose = match self {
            Self::Test => {
                "information about the DNA test itself (company, date, array version, etc.)"
            }
            Self::Subject => {
                "personal information about the individual (demographics, background, etc.)"
            }
        };
        format!(
            "No {} file found for subject '{subject}'. \
             You can create this optional file to add {purpose}.",
            self.file_name()
        )
    }
}

/// Query orchestrator over a subject store.
///
/// Every call builds its state from scratch; nothing is shared between
/// requests except the read-only configuration and store handle.
#[derive(Debug, Clone)]
pub struct DnaOps<S = FsStore> {
    config: DnaConfig,
    store: S,
}

impl DnaOps<FsStore> {
    /// Orchestrator over the local filesystem.
    #[must_use]
    pub fn with_fs(config: DnaConfig) -> Self {
        Self::new(config, FsStore)
    }
}

impl<S: SubjectStore> DnaOps<S> {
    #[must_use]
    pub fn new(config: DnaConfig, store: S) -> Self {
        Self { config, store }
    }

    #[must_use]
    pub fn config(&self) -> &DnaConfig {
        &self.config
    }

    /// List subject directories, optionally filtered by a regular expression
    /// searched anywhere in the name. An empty pattern means no filter.
    ///
    /// A missing store root yields an empty list without looking at the
    /// pattern.
    ///
    /// # Errors
    /// [`QueryError::InvalidPattern`] if `pattern` does not compile, or
    /// [`QueryError::ListSubjects`] if the root cannot be enumerated.
    pub async fn list_subjects(&self, pattern: Option<&str>) -> Result<SubjectList, QueryError> {
        let root = &self.config.root;
        if !self.store.is_container(root).await {
            tracing::debug!(root = %root.display(), "store root missing; no subjects");
            return Ok(SubjectList::default());
        }

        let filter = match pattern.filter(|p| !p.is_empty()) {
            Some(p) => Some(Regex::new(p).map_err(|source| QueryError::InvalidPattern {
                pattern: p.to_owned(),
                source,
            })?),
            None => None,
        };

        let entries = self
            .store
            .list_entries(root)
            .await
            .map_err(QueryError::ListSubjects)?;

        let mut subjects = Vec::with_capacity(entries.len());
        for name in entries {
            if filter.as_ref().is_some_and(|re| !re.is_match(&name)) {
                continue;
            }
            if self.store.is_container(&root.join(&name)).await {
                subjects.push(name);
            }
        }
        subjects.sort();

        Ok(SubjectList { subjects })
    }

    /// Metadata about the DNA test of `subject`.
    ///
    /// # Errors
    /// See [`DnaOps::get_info`].
    pub async fn get_test_info(&self, subject: &str) -> Result<InfoResult, QueryError> {
        self.get_info(subject, InfoFile::Test).await
    }

    /// Metadata about `subject` as a person.
    ///
    /// # Errors
    /// See [`DnaOps::get_info`].
    pub async fn get_subject_info(&self, subject: &str) -> Result<InfoResult, QueryError> {
        self.get_info(subject, InfoFile::Subject).await
    }

    /// Return the trimmed text of one of the subject's metadata files.
    ///
    /// An absent file is not an error: the result carries `info: None` and a
    /// hint on how to add it.
    ///
    /// # Errors
    /// [`QueryError::SubjectNotFound`] if the subject directory does not
    /// exist, or [`QueryError::Read`] if the file cannot be read.
    pub async fn get_info(&self, subject: &str, which: InfoFile) -> Result<InfoResult, QueryError> {
        let dir = self.existing_subject_dir(subject).await?;

        let path = dir.join(which.file_name());
        if !self.store.exists(&path).await {
            return Ok(InfoResult {
                subject: subject.to_owned(),
                info: None,
                message: Some(which.missing_hint(subject)),
            });
        }

        let text = self.read(subject, &path, which.file_name()).await?;
        Ok(InfoResult {
            subject: subject.to_owned(),
            info: Some(text.trim().to_owned()),
            message: None,
        })
    }

    /// Look up marker rows for the requested identifiers.
    ///
    /// The identifier list is normalized and passed through the privacy gate
    /// before the store is touched at all. Identifiers are then matched and
    /// echoed exactly as sent: a padded `" rs1"` passes the gate but only
    /// matches a row whose first column is `" rs1"`.
    ///
    /// # Errors
    /// [`QueryError::Rejected`] if the gate refuses the list,
    /// [`QueryError::SubjectNotFound`] / [`QueryError::MissingFile`] if the
    /// subject or its marker file is absent, or [`QueryError::Read`] if the
    /// marker file cannot be read.
    pub async fn query_snp_data(
        &self,
        subject: &str,
        rsids: RsidInput,
    ) -> Result<SnpQueryResult, QueryError> {
        let queried = rsids.normalize();
        privacy::check(&queried)?;

        let dir = self.existing_subject_dir(subject).await?;
        let path = dir.join(SNP_FILE);
        if !self.store.exists(&path).await {
            return Err(QueryError::MissingFile {
                subject: subject.to_owned(),
                file: SNP_FILE,
            });
        }

        let text = self.read(subject, &path, SNP_FILE).await?;
        let outcome = scan(&text, &queried);
        let not_found = outcome.not_found(&queried);

        tracing::debug!(
            subject,
            queried = queried.len(),
            matched_rows = outcome.rows.len(),
            not_found = not_found.len(),
            "snp query complete"
        );

        Ok(SnpQueryResult {
            subject: subject.to_owned(),
            header: outcome.header,
            found_count: outcome.rows.len(),
            matching_rows: outcome.rows,
            queried_rsids: queried,
            found_rsids: outcome.found,
            not_found_rsids: not_found,
        })
    }

    async fn existing_subject_dir(&self, subject: &str) -> Result<PathBuf, QueryError> {
        let Some(dir) = self.subject_dir(subject) else {
            return Err(QueryError::SubjectNotFound(subject.to_owned()));
        };
        if self.store.is_container(&dir).await {
            Ok(dir)
        } else {
            Err(QueryError::SubjectNotFound(subject.to_owned()))
        }
    }

    /// Directory for `subject`, if the name denotes a single entry directly
    /// under the root. Names like `..`, `a/b` or absolute paths do not.
    fn subject_dir(&self, subject: &str) -> Option<PathBuf> {
        let mut components = Path::new(subject).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name.to_str() == Some(subject) => {
                Some(self.config.root.join(name))
            }
            _ => None,
        }
    }

    async fn read(
        &self,
        subject: &str,
        path: &Path,
        file: &'static str,
    ) -> Result<String, QueryError> {
        self.store
            .read_text(path, self.config.max_file_size, self.config.read_timeout)
            .await
            .map_err(|source| {
                tracing::warn!(subject, file, error = %source, "failed to read subject file");
                QueryError::Read {
                    subject: subject.to_owned(),
                    file,
                    source,
                }
            })
    }
}
