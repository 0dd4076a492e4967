//! Two-pass classification of a whole library
//!
//! 1. Rules: every file goes through the naming rules in parallel, unless a
//!    manual override already decides it.
//! 2. Similarity: confidently labelled items train a TF-IDF index, and the
//!    items the rules left unsorted are matched against it.
//!
//! Both passes run in chunks so a scan can be cancelled between them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use sfxsort_core::{Error, Result, RuleBasedClassifier, SimilarityIndex};
use sfxsort_similarity::{SimilarityClassifier, SimilarityMatch};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::item::SoundItem;
use crate::overrides::ManualOverrides;
use crate::scan::discover_audio_files;

const MIN_SIMILARITY_CONFIDENCE: f64 = 0.10;
const MAX_SIMILARITY_CONFIDENCE: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Rules,
    Similarity,
}

/// Progress report, sent after every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    pub done: usize,
    pub total: usize,
}

pub struct LibraryClassifier {
    config: PipelineConfig,
    rules: RuleBasedClassifier,
    similarity: SimilarityClassifier,
}

impl LibraryClassifier {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            similarity: SimilarityClassifier::new(config.similarity),
            rules: RuleBasedClassifier::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Discover every audio file under `root`, then classify them
    pub fn scan<F>(
        &self,
        root: &Path,
        overrides: &ManualOverrides,
        cancel: &AtomicBool,
        progress: F,
    ) -> Result<Vec<SoundItem>>
    where
        F: FnMut(ScanProgress),
    {
        let paths = discover_audio_files(root)?;
        self.classify(root, &paths, overrides, cancel, progress)
    }

    /// Classify `paths` (all under `root`) and return items in input order.
    ///
    /// Returns `Error::Cancelled` as soon as `cancel` is seen between chunks.
    pub fn classify<F>(
        &self,
        root: &Path,
        paths: &[PathBuf],
        overrides: &ManualOverrides,
        cancel: &AtomicBool,
        mut progress: F,
    ) -> Result<Vec<SoundItem>>
    where
        F: FnMut(ScanProgress),
    {
        let mut items = self.rule_pass(root, paths, overrides, cancel, &mut progress)?;

        let corpus = self.training_corpus(&items);
        if corpus.len() < self.config.min_corpus_size {
            info!(
                labelled = corpus.len(),
                min_corpus_size = self.config.min_corpus_size,
                "too few labelled items, skipping similarity pass"
            );
            return Ok(items);
        }

        check_cancel(cancel)?;
        let index = SimilarityIndex::build(corpus);
        self.similarity_pass(&index, &mut items, cancel, &mut progress)?;

        Ok(items)
    }

    fn rule_pass<F>(
        &self,
        root: &Path,
        paths: &[PathBuf],
        overrides: &ManualOverrides,
        cancel: &AtomicBool,
        progress: &mut F,
    ) -> Result<Vec<SoundItem>>
    where
        F: FnMut(ScanProgress),
    {
        let total = paths.len();
        let mut items: Vec<SoundItem> = Vec::with_capacity(total);

        for (chunk_idx, chunk) in paths.chunks(self.config.chunk_size).enumerate() {
            check_cancel(cancel)?;
            let offset = chunk_idx * self.config.chunk_size;

            let mut tagged: Vec<(usize, SoundItem)> = chunk
                .par_iter()
                .enumerate()
                .map(|(i, path)| (offset + i, self.classify_one(root, path, overrides)))
                .collect();
            tagged.sort_unstable_by_key(|(idx, _)| *idx);
            items.extend(tagged.into_iter().map(|(_, item)| item));

            progress(ScanProgress {
                phase: ScanPhase::Rules,
                done: items.len(),
                total,
            });
        }

        let unsorted = items.iter().filter(|i| i.is_unsorted()).count();
        info!(items = items.len(), unsorted, "rule pass complete");
        Ok(items)
    }

    fn classify_one(&self, root: &Path, path: &Path, overrides: &ManualOverrides) -> SoundItem {
        let mut item = SoundItem::new(root, path);
        match overrides.get(&item.relative_key) {
            Some(category) => {
                item.set_manual(category);
                item.smart_confidence = 1.0;
            }
            None => {
                let classification = self.rules.infer(&item.full_path.to_string_lossy());
                item.apply_rules(&classification);
            }
        }
        item
    }

    /// `(text, category)` pairs of every item confident enough to teach the
    /// similarity index. Manual overrides always count.
    pub fn training_corpus(&self, items: &[SoundItem]) -> Vec<(String, String)> {
        items
            .iter()
            .filter(|item| !item.is_unsorted())
            .filter(|item| {
                item.is_manual() || item.smart_confidence >= self.config.min_training_confidence
            })
            .map(|item| (item.classifiable_text(), item.effective_category().to_string()))
            .collect()
    }

    /// Whether the similarity pass should try to place `item`
    pub fn is_requery_target(&self, item: &SoundItem) -> bool {
        !item.is_manual()
            && (item.is_unsorted() || item.smart_confidence < self.config.requery_below_confidence)
    }

    fn similarity_pass<F>(
        &self,
        index: &SimilarityIndex,
        items: &mut [SoundItem],
        cancel: &AtomicBool,
        progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(ScanProgress),
    {
        let targets: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.is_requery_target(item))
            .map(|(idx, _)| idx)
            .collect();

        let total = targets.len();
        let mut done = 0usize;
        let mut placed = 0usize;

        for chunk in targets.chunks(self.config.chunk_size) {
            check_cancel(cancel)?;

            let shared: &[SoundItem] = items;
            let results: Vec<(usize, SimilarityMatch)> = chunk
                .par_iter()
                .map(|&idx| (idx, self.similarity.infer(&shared[idx].classifiable_text(), index)))
                .collect();

            for (idx, result) in results {
                if let Some(category) = result.category {
                    let confidence = self.calibrate(result.similarity);
                    items[idx].apply_similarity(category, confidence);
                    placed += 1;
                }
            }

            done += chunk.len();
            progress(ScanProgress {
                phase: ScanPhase::Similarity,
                done,
                total,
            });
        }

        info!(
            targets = total,
            placed,
            documents = index.len(),
            "similarity pass complete"
        );
        Ok(())
    }

    /// Map a similarity hit to an item confidence
    pub fn calibrate(&self, similarity: f32) -> f64 {
        (f64::from(similarity) * self.config.similarity_confidence_scale)
            .clamp(MIN_SIMILARITY_CONFIDENCE, MAX_SIMILARITY_CONFIDENCE)
    }
}

fn check_cancel(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        debug!("scan cancelled");
        return Err(Error::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::CategorySource;
    use sfxsort_similarity::SimilarityConfig;

    fn classifier(min_corpus_size: usize, chunk_size: usize) -> LibraryClassifier {
        LibraryClassifier::new(PipelineConfig {
            min_corpus_size,
            chunk_size,
            ..Default::default()
        })
        .unwrap()
    }

    fn library_paths() -> (PathBuf, Vec<PathBuf>) {
        let root = PathBuf::from("/lib");
        let mut paths = Vec::new();
        for i in 0..10 {
            paths.push(root.join(format!("Amb/AMBUrbn_zorblax_quonk_{:02}.wav", i)));
        }
        paths.push(root.join("Xyzzy/qq_zorblax_quonk.wav"));
        paths.push(root.join("Xyzzy/Xk92_misc.wav"));
        (root, paths)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(LibraryClassifier::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rule_pass_keeps_order() {
        let (root, paths) = library_paths();
        let cancel = AtomicBool::new(false);
        let items = classifier(10_000, 3)
            .classify(&root, &paths, &ManualOverrides::new(), &cancel, |_| {})
            .unwrap();

        assert_eq!(items.len(), paths.len());
        for (item, path) in items.iter().zip(&paths) {
            assert_eq!(&item.full_path, path);
        }
        assert_eq!(items[0].effective_category(), "Ambient/Ambience/Urban");
        assert_eq!(items[0].smart_confidence, 0.92);
        assert_eq!(items[11].effective_category(), "Unsorted/Xyzzy");
    }

    #[test]
    fn test_override_bypasses_classifiers() {
        let (root, paths) = library_paths();
        let overrides = ManualOverrides::from_pairs([("amb/ambURBN_zorblax_quonk_03.wav", "Foley/Misc")]);
        let cancel = AtomicBool::new(false);
        let items = classifier(10_000, 300)
            .classify(&root, &paths, &overrides, &cancel, |_| {})
            .unwrap();

        let item = &items[3];
        assert_eq!(item.source, CategorySource::Manual);
        assert_eq!(item.effective_category(), "Foley/Misc");
        assert_eq!(item.smart_confidence, 1.0);
        // rules never ran for it
        assert_eq!(item.smart_category, "Unsorted");
    }

    #[test]
    fn test_corpus_gate_skips_similarity() {
        let (root, paths) = library_paths();
        let cancel = AtomicBool::new(false);
        let mut phases = Vec::new();
        let items = classifier(200, 4)
            .classify(&root, &paths, &ManualOverrides::new(), &cancel, |p| phases.push(p))
            .unwrap();

        assert!(phases.iter().all(|p| p.phase == ScanPhase::Rules));
        assert_eq!(phases.last().map(|p| (p.done, p.total)), Some((12, 12)));
        assert_eq!(phases.len(), 3);
        assert!(items[10].is_unsorted());
    }

    #[test]
    fn test_similarity_pass_places_unsorted() {
        let (root, paths) = library_paths();
        let cancel = AtomicBool::new(false);
        let mut phases = Vec::new();
        let pipeline = classifier(5, 300);
        let items = pipeline
            .classify(&root, &paths, &ManualOverrides::new(), &cancel, |p| phases.push(p))
            .unwrap();

        let placed = &items[10];
        assert_eq!(placed.source, CategorySource::Similarity);
        assert_eq!(placed.effective_category(), "Ambient/Ambience/Urban");
        assert!(placed.smart_confidence >= 0.10 && placed.smart_confidence <= 0.98);

        // shares nothing with the corpus
        assert_eq!(items[11].effective_category(), "Unsorted/Xyzzy");
        assert_eq!(items[11].source, CategorySource::Rules);

        let similarity: Vec<_> = phases.iter().filter(|p| p.phase == ScanPhase::Similarity).collect();
        assert_eq!(similarity.len(), 1);
        assert_eq!((similarity[0].done, similarity[0].total), (2, 2));
    }

    #[test]
    fn test_cancel_before_start() {
        let (root, paths) = library_paths();
        let cancel = AtomicBool::new(true);
        let result = classifier(5, 300).classify(&root, &paths, &ManualOverrides::new(), &cancel, |_| {});
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_cancel_between_chunks() {
        let (root, paths) = library_paths();
        let cancel = AtomicBool::new(false);
        let mut reports = 0;
        let result = classifier(5, 2).classify(&root, &paths, &ManualOverrides::new(), &cancel, |_| {
            reports += 1;
            cancel.store(true, Ordering::Relaxed);
        });
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(reports, 1);
    }

    #[test]
    fn test_training_corpus_filters() {
        let pipeline = LibraryClassifier::new(PipelineConfig {
            min_training_confidence: 0.5,
            ..Default::default()
        })
        .unwrap();
        let root = Path::new("/lib");

        let mut strong = SoundItem::new(root, Path::new("/lib/a/AMB_x.wav"));
        strong.apply_rules(&sfxsort_core::Classification::new("Ambient", "Ambience", 0.92));
        let mut weak = SoundItem::new(root, Path::new("/lib/a/old hatch.wav"));
        weak.apply_rules(&sfxsort_core::Classification::new("Doors", "General", 0.45));
        let mut manual = SoundItem::new(root, Path::new("/lib/a/thing.wav"));
        manual.set_manual("Foley");
        let unsorted = SoundItem::new(root, Path::new("/lib/a/Xk92.wav"));

        let corpus = pipeline.training_corpus(&[strong, weak, manual, unsorted]);
        let categories: Vec<&str> = corpus.iter().map(|(_, c)| c.as_str()).collect();
        assert_eq!(categories, vec!["Ambient/Ambience", "Foley"]);
        assert_eq!(corpus[0].0, "a amb x");
    }

    #[test]
    fn test_requery_targets() {
        let pipeline = LibraryClassifier::new(PipelineConfig {
            requery_below_confidence: 0.5,
            ..Default::default()
        })
        .unwrap();
        let root = Path::new("/lib");

        let mut weak = SoundItem::new(root, Path::new("/lib/a/old hatch.wav"));
        weak.apply_rules(&sfxsort_core::Classification::new("Doors", "General", 0.45));
        assert!(pipeline.is_requery_target(&weak));

        let mut strong = SoundItem::new(root, Path::new("/lib/a/AMB_x.wav"));
        strong.apply_rules(&sfxsort_core::Classification::new("Ambient", "Ambience", 0.92));
        assert!(!pipeline.is_requery_target(&strong));

        let mut manual = SoundItem::new(root, Path::new("/lib/a/Xk92.wav"));
        manual.set_manual("Unsorted");
        assert!(!pipeline.is_requery_target(&manual));

        let unsorted = SoundItem::new(root, Path::new("/lib/a/Xk92.wav"));
        assert!(pipeline.is_requery_target(&unsorted));
    }

    #[test]
    fn test_calibration() {
        let pipeline = classifier(200, 300);
        assert!((pipeline.calibrate(0.4) - 0.5).abs() < 1e-6);
        assert_eq!(pipeline.calibrate(0.0), 0.10);
        assert_eq!(pipeline.calibrate(1.0), 0.98);

        let scaled = LibraryClassifier::new(PipelineConfig {
            similarity_confidence_scale: 1.0,
            similarity: SimilarityConfig::default(),
            ..Default::default()
        })
        .unwrap();
        assert!((scaled.calibrate(0.5) - 0.5).abs() < 1e-6);
    }
}
