use std::collections::HashMap;

use crate::domain::Entity;

/// Duplicate findings from the two dedup passes. Keys keep first-seen order
/// so bounded issue samples stay stable across runs.
#[derive(Debug, Default)]
pub struct DuplicateReport {
    /// entity_id -> source files of the discarded later occurrences
    pub duplicate_ids: Vec<(String, Vec<String>)>,
    /// entity name -> source files of surviving same-name records
    pub duplicate_names: Vec<(String, Vec<String>)>,
}

impl DuplicateReport {
    fn note(target: &mut Vec<(String, Vec<String>)>, key: &str, file: &str) {
        match target.iter_mut().find(|(k, _)| k == key) {
            Some((_, files)) => files.push(file.to_string()),
            None => target.push((key.to_string(), vec![file.to_string()])),
        }
    }
}

/// Two-pass, order-dependent deduplication.
///
/// Pass one collapses by lowercased trimmed `entity_id`, keeping the first
/// occurrence in ingestion order and discarding later ones. Colliding
/// synthesized ids are the intended merge path for the same entity appearing
/// in several files, so only collisions on explicit identifiers are reported
/// as conflicts. Pass two only reports same-name collisions among the
/// survivors: identical names can legitimately be distinct facilities sharing
/// a brand name, whereas identical identifiers cannot.
pub fn dedupe(entities: Vec<Entity>) -> (Vec<Entity>, DuplicateReport) {
    let mut report = DuplicateReport::default();

    let mut seen_ids: HashMap<String, ()> = HashMap::new();
    let mut survivors: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        let key = entity.entity_id.trim().to_lowercase();
        if seen_ids.contains_key(&key) {
            if entity.entity_identifier.is_some() {
                DuplicateReport::note(&mut report.duplicate_ids, &entity.entity_id, &entity.source_file);
            }
            continue;
        }
        seen_ids.insert(key, ());
        survivors.push(entity);
    }

    let mut seen_names: HashMap<String, ()> = HashMap::new();
    for entity in &survivors {
        let name_key = entity.name.trim().to_lowercase();
        if seen_names.contains_key(&name_key) {
            DuplicateReport::note(&mut report.duplicate_names, &entity.name, &entity.source_file);
        } else {
            seen_names.insert(name_key, ());
        }
    }

    (survivors, report)
}
