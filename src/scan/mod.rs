mod record;
mod report;

pub use record::{FileContent, FileReader, FileRecord, MODIFIED_FORMAT, ScanEntry, read_text};
pub use report::{ReportHeader, ScanOutcome, ScanReport, ScanStatus};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::analyzer::ExtractorRegistry;
use crate::config::{OutputMode, ScanJob};
use crate::digest::DigestBuilder;
use crate::error::{DirDigestError, ItemError, Result};
use crate::language::LanguageRegistry;
use crate::output::{DigestFormatter, JsonFormatter, OutputFormatter, TextFormatter, TreeRenderer};
use crate::progress::{ProgressHandle, ProgressObserver, ProgressTracker, ProgressVisitor};
use crate::scanner::{ExclusionFilter, ItemCounter, ItemFilter, TreeWalker, WalkEntry, WalkVisitor};

/// Layout of the scan date in every artifact.
pub const SCAN_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Buffered writer over the destination.
///
/// The first failed write is kept and every later write is skipped; the
/// error surfaces from [`finish`](Self::finish). Whatever was flushed before
/// the failure stays on disk.
struct ArtifactSink<W: Write> {
    writer: BufWriter<W>,
    error: Option<io::Error>,
}

impl<W: Write> ArtifactSink<W> {
    fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            error: None,
        }
    }

    const fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    fn write(&mut self, chunk: &str) {
        self.write_with(|writer| writer.write_all(chunk.as_bytes()));
    }

    fn write_with(&mut self, emit: impl FnOnce(&mut BufWriter<W>) -> io::Result<()>) {
        if self.error.is_none()
            && let Err(err) = emit(&mut self.writer)
        {
            warn!(%err, "artifact write failed");
            self.error = Some(err);
        }
    }

    fn finish(mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }
}

/// Files and inline errors that made it into the artifact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    files: usize,
    inline_errors: usize,
}

impl Tally {
    const fn count_file(&mut self, record: &FileRecord) {
        self.files += 1;
        if record.is_error() {
            self.inline_errors += 1;
        }
    }
}

fn directory_event(entry: &WalkEntry) -> ScanEntry {
    ScanEntry::Directory {
        path: entry.path.clone(),
        name: entry.name.clone(),
        depth: entry.depth,
    }
}

/// Runs alongside the count pass and picks the file each priority name
/// selects: its first match in traversal order that an earlier name has not
/// already taken.
struct PriorityLocator<'a> {
    names: &'a [String],
    found: Vec<Option<WalkEntry>>,
}

impl<'a> PriorityLocator<'a> {
    fn new(names: &'a [String]) -> Self {
        Self {
            names,
            found: vec![None; names.len()],
        }
    }

    /// Selected files in priority-list order.
    fn into_entries(self) -> Vec<WalkEntry> {
        self.found.into_iter().flatten().collect()
    }
}

impl WalkVisitor for PriorityLocator<'_> {
    fn visit_file(&mut self, entry: &WalkEntry) {
        let slot = self
            .names
            .iter()
            .zip(&mut self.found)
            .find(|(name, found)| found.is_none() && **name == entry.name);
        if let Some((_, found)) = slot {
            *found = Some(entry.clone());
        }
    }
}

/// Content pass for formats that need every event first (grouped text, JSON).
struct ContentCollector<'a> {
    reader: &'a FileReader<'a>,
    entries: Vec<ScanEntry>,
}

impl WalkVisitor for ContentCollector<'_> {
    fn visit_dir(&mut self, entry: &WalkEntry) {
        self.entries.push(directory_event(entry));
    }

    fn visit_file(&mut self, entry: &WalkEntry) {
        self.entries.push(ScanEntry::File(self.reader.read(entry)));
    }

    fn visit_error(&mut self, error: &ItemError, depth: usize) {
        self.entries.push(ScanEntry::DirectoryError {
            error: error.clone(),
            depth,
        });
    }
}

/// Content pass of an ungrouped text dump: each event is written as soon as
/// it is read, so at most one file body is held at a time.
struct TextStreamer<'a, W: Write> {
    reader: &'a FileReader<'a>,
    formatter: &'a TextFormatter,
    /// Priority files, already written ahead of the walk.
    skipped: &'a HashSet<PathBuf>,
    sink: &'a mut ArtifactSink<W>,
    tally: Tally,
}

impl<W: Write> WalkVisitor for TextStreamer<'_, W> {
    fn visit_dir(&mut self, entry: &WalkEntry) {
        self.sink.write(&self.formatter.entry(&directory_event(entry)));
    }

    fn visit_file(&mut self, entry: &WalkEntry) {
        if self.skipped.contains(&entry.path) || self.sink.is_failed() {
            return;
        }
        let record = self.reader.read(entry);
        self.tally.count_file(&record);
        self.sink.write(&self.formatter.entry(&ScanEntry::File(record)));
    }

    fn visit_error(&mut self, error: &ItemError, depth: usize) {
        self.tally.inline_errors += 1;
        self.sink.write(&self.formatter.entry(&ScanEntry::DirectoryError {
            error: error.clone(),
            depth,
        }));
    }
}

/// What every content pass walks with.
struct ContentPass<'a> {
    root: &'a Path,
    filter: &'a ExclusionFilter,
    reader: &'a FileReader<'a>,
    tracker: &'a ProgressTracker<'a>,
}

impl ContentPass<'_> {
    /// Walk with `inner`, advancing progress once per admitted item.
    fn walk<V: WalkVisitor>(&self, inner: V) -> V {
        let mut visitor = ProgressVisitor::new(inner, self.tracker);
        TreeWalker::new(self.root, self.filter).walk(&mut visitor);
        visitor.into_inner()
    }
}

/// Runs one [`ScanJob`] end to end.
///
/// Every pass (count, tree, content) walks through the same filter, so the
/// total computed up front always matches the items advanced afterwards.
pub struct ScanOrchestrator {
    job: ScanJob,
    languages: LanguageRegistry,
    extractors: ExtractorRegistry,
    progress: ProgressHandle,
}

impl ScanOrchestrator {
    #[must_use]
    pub fn new(job: ScanJob) -> Self {
        Self {
            job,
            languages: LanguageRegistry::default(),
            extractors: ExtractorRegistry::default(),
            progress: ProgressHandle::new(),
        }
    }

    /// Replace the symbol extractors; languages without one get no symbols.
    #[must_use]
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    /// Read side of this run's progress; valid before, during and after it.
    #[must_use]
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Run the job on the calling thread.
    ///
    /// An ungrouped text dump is written while the tree is walked; grouped
    /// text and JSON are written once the walk is done.
    ///
    /// # Errors
    /// Returns [`DirDigestError::Destination`] if the artifact cannot be
    /// created or written. Unreadable files and directories are embedded in
    /// the artifact instead.
    pub fn run(&self, observer: &dyn ProgressObserver) -> Result<ScanOutcome> {
        let job = &self.job;
        info!(root = %job.root.display(), output = %job.output.display(), "starting scan");

        let file = File::create(&job.output)
            .map_err(|err| DirDigestError::destination(&job.output, err))?;
        let mut sink = ArtifactSink::new(file);
        let filter = ExclusionFilter::new(job.exclusions.clone())
            .with_skipped_file(dunce::canonicalize(&job.output).ok());
        let tracker = ProgressTracker::new(self.progress.clone(), observer);

        let mut count_pass = (ItemCounter::default(), PriorityLocator::new(&job.priority_files));
        TreeWalker::new(&job.root, &filter).walk(&mut count_pass);
        let (counter, priority) = count_pass;
        debug!(
            directories = counter.directories,
            files = counter.files,
            "count pass finished"
        );
        tracker.start(counter.total());

        let header = ReportHeader {
            project_name: job.project_name(),
            scan_date: Local::now().format(SCAN_DATE_FORMAT).to_string(),
            structure: TreeRenderer::new(&filter, job.max_depth).render(&job.root),
            readme: find_readme(&job.root, &filter).map(|path| read_text(&path)),
        };
        let reader = FileReader::new(job.max_file_size, &self.languages, &self.extractors);
        let pass = ContentPass {
            root: &job.root,
            filter: &filter,
            reader: &reader,
            tracker: &tracker,
        };

        let tally = if job.digest {
            Self::write_digest(&pass, header, &mut sink)
        } else if job.output_mode == OutputMode::Text && !job.group_by_extension {
            self.stream_text(&pass, &header, &priority.into_entries(), &mut sink)
        } else {
            self.write_collected(&pass, header, &mut sink)?
        };

        sink.finish()
            .map_err(|err| DirDigestError::destination(&job.output, err))?;
        tracker.complete();

        let (processed, total) = self.progress.snapshot();
        let Tally {
            files,
            inline_errors,
        } = tally;
        info!(total, processed, files, inline_errors, "scan finished");
        Ok(ScanOutcome {
            output: job.output.clone(),
            total,
            processed,
            files,
            inline_errors,
        })
    }

    fn stream_text<W: Write>(
        &self,
        pass: &ContentPass<'_>,
        header: &ReportHeader,
        priority: &[WalkEntry],
        sink: &mut ArtifactSink<W>,
    ) -> Tally {
        let formatter = TextFormatter::new().with_metadata(self.job.include_metadata);
        let mut tally = Tally::default();
        sink.write(&TextFormatter::header(header));

        let mut skipped = HashSet::new();
        for entry in priority {
            let record = pass.reader.read(entry);
            tally.count_file(&record);
            sink.write(&formatter.priority_section(&record));
            skipped.insert(entry.path.clone());
        }

        let streamer = pass.walk(TextStreamer {
            reader: pass.reader,
            formatter: &formatter,
            skipped: &skipped,
            sink,
            tally,
        });
        streamer.tally
    }

    fn write_collected<W: Write>(
        &self,
        pass: &ContentPass<'_>,
        header: ReportHeader,
        sink: &mut ArtifactSink<W>,
    ) -> Result<Tally> {
        let job = &self.job;
        let collector = pass.walk(ContentCollector {
            reader: pass.reader,
            entries: Vec::new(),
        });
        let report = ScanReport {
            header,
            entries: collector.entries,
        };

        match job.output_mode {
            OutputMode::Text => {
                let artifact = TextFormatter::new()
                    .with_grouping(job.group_by_extension)
                    .with_metadata(job.include_metadata)
                    .with_priority_files(job.priority_files.clone())
                    .format(&report)?;
                sink.write(&artifact);
            }
            OutputMode::Structured => {
                sink.write_with(|writer| JsonFormatter.write_to(&report, writer));
            }
        }
        Ok(Tally {
            files: report.files().count(),
            inline_errors: report.inline_errors(),
        })
    }

    fn write_digest<W: Write>(
        pass: &ContentPass<'_>,
        header: ReportHeader,
        sink: &mut ArtifactSink<W>,
    ) -> Tally {
        let builder = pass.walk(DigestBuilder::new(pass.reader));
        let summary = builder.finish(header.project_name, header.structure, header.readme);
        sink.write(&DigestFormatter.format(&summary));

        let unreadable_keys = summary
            .key_files
            .iter()
            .filter(|key| key.record.is_error())
            .count();
        Tally {
            files: summary.key_files.len(),
            inline_errors: summary.errors.len() + unreadable_keys,
        }
    }

    /// Run the job on a dedicated worker thread.
    ///
    /// # Errors
    /// Returns [`DirDigestError::Worker`] if the thread cannot be spawned.
    pub fn spawn<O>(self, observer: O) -> Result<ScanHandle>
    where
        O: ProgressObserver + 'static,
    {
        let progress = self.progress();
        let worker = thread::Builder::new()
            .name("dirdigest-scan".to_string())
            .spawn(move || self.run(&observer))
            .map_err(|err| DirDigestError::Worker(err.to_string()))?;
        Ok(ScanHandle { progress, worker })
    }
}

/// A scan running on its worker thread.
pub struct ScanHandle {
    progress: ProgressHandle,
    worker: JoinHandle<Result<ScanOutcome>>,
}

impl ScanHandle {
    #[must_use]
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker and return its result.
    ///
    /// # Errors
    /// Returns the run's own error, or [`DirDigestError::Worker`] if the
    /// worker panicked.
    pub fn join(self) -> Result<ScanOutcome> {
        self.worker
            .join()
            .map_err(|_| DirDigestError::Worker("scan worker panicked".to_string()))?
    }
}

/// First root-level file whose lower-cased name starts with `readme` and
/// which `filter` admits, in sorted name order.
#[must_use]
pub fn find_readme<F: ItemFilter>(root: &Path, filter: &F) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .starts_with("readme")
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let found = candidates
        .into_iter()
        .find(|path| filter.should_include(path, false));
    debug!(readme = ?found, "readme lookup");
    found
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
