use std::collections::HashSet;

use log::{debug, log, warn, Level};

use crate::config::{LinkingConfig, LoggingConfig, MarginaliaConfig};
use crate::error::{Error, Result, StoreError};
use crate::model::{LinkEdge, NoteId, NoteTitle, WikiLink};
use crate::resolve::{autocomplete, resolve_links};
use crate::store::{LinkStore, NoteCatalog};
use crate::utils::time::{Clock, SystemClock};

/// What a synchronisation pass did with the links of one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSyncReport {
    /// Edges written by this pass
    pub created: Vec<LinkEdge>,
    /// Edges deleted because the content no longer references their target
    pub removed: Vec<LinkEdge>,
    /// References whose edge already existed
    pub duplicates: usize,
    /// References that resolved to the source note itself
    pub self_links: usize,
    /// References that matched no title
    pub orphans: Vec<WikiLink>,
}

/// Turns `[[...]]` references in saved note content into graph edges.
pub struct LinkSync<C: Clock = SystemClock> {
    linking: LinkingConfig,
    logging: LoggingConfig,
    clock: C,
}

impl LinkSync<SystemClock> {
    pub fn new(config: &MarginaliaConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LinkSync<C> {
    pub fn with_clock(config: &MarginaliaConfig, clock: C) -> Self {
        Self {
            linking: config.linking.clone(),
            logging: config.logging.clone(),
            clock,
        }
    }

    /// Resolve every link in `content` against the current corpus and add
    /// one edge `source -> target` per resolved reference.
    ///
    /// Every edge is built and validated before the first write, so a
    /// rejected self reference leaves the store untouched. Existing edges
    /// are left alone; hitting the uniqueness constraint is counted, not
    /// reported as an error. A store failure midway returns
    /// `Error::SyncInterrupted` with the edges written so far.
    pub fn sync<S>(&self, store: &mut S, source: NoteId, content: &str) -> Result<LinkSyncReport>
    where
        S: NoteCatalog + LinkStore,
    {
        let corpus = store.note_titles()?;
        let now = self.clock.now();
        let mut report = LinkSyncReport::default();
        let mut referenced = HashSet::new();
        let mut planned = Vec::new();

        for found in resolve_links(content, &corpus) {
            let Some(target) = found.target else {
                report.orphans.push(found.link);
                continue;
            };

            if target.id == source && self.linking.skip_self_links {
                report.self_links += 1;
                continue;
            }

            referenced.insert(target.id);
            planned.push(LinkEdge::new(
                source,
                target.id,
                self.linking.default_relationship,
                now,
            )?);
        }

        for edge in planned {
            match store.insert_link(edge.clone()) {
                Ok(()) => report.created.push(edge),
                Err(StoreError::DuplicateLink { .. }) => {
                    debug!("link {} -> {} already present", source, edge.target_note_id);
                    report.duplicates += 1;
                }
                Err(err) => return Err(self.interrupted(source, report, err)),
            }
        }

        if self.linking.prune_stale_links {
            let existing = match store.links_from(&source) {
                Ok(existing) => existing,
                Err(err) => return Err(self.interrupted(source, report, err)),
            };
            let stale = existing.into_iter().filter(|edge| {
                edge.relationship_type == self.linking.default_relationship
                    && !referenced.contains(&edge.target_note_id)
            });
            for edge in stale {
                match store.remove_link(&source, &edge.target_note_id) {
                    Ok(removed) => report.removed.push(removed),
                    Err(err) => return Err(self.interrupted(source, report, err)),
                }
            }
        }

        let level = if self.logging.log_link_sync {
            Level::Info
        } else {
            Level::Debug
        };
        log!(
            level,
            "synced links for {}: {} created, {} removed, {} existing, {} orphan",
            source,
            report.created.len(),
            report.removed.len(),
            report.duplicates,
            report.orphans.len()
        );

        Ok(report)
    }

    fn interrupted(&self, source_id: NoteId, report: LinkSyncReport, source: StoreError) -> Error {
        warn!(
            "link sync for {} stopped after {} created, {} removed: {}",
            source_id,
            report.created.len(),
            report.removed.len(),
            source
        );
        Error::SyncInterrupted {
            source_id,
            report: Box::new(report),
            source,
        }
    }

    /// Autocomplete suggestions from the store's corpus.
    pub fn suggest<S: NoteCatalog>(
        &self,
        store: &S,
        query: &str,
        exclude: Option<&NoteId>,
        requested: Option<usize>,
    ) -> Result<Vec<NoteTitle>> {
        let corpus = store.note_titles()?;
        let limit = self.linking.suggestion_limit(requested);
        Ok(autocomplete(query, &corpus, exclude, limit)
            .into_iter()
            .cloned()
            .collect())
    }
}
