//! Synonym closure over alias files.
//!
//! Visual Genome annotations are free text, so the same concept shows up as
//! `man`, `guy`, `person`, `men`, ... Alias files group such names, one group
//! per line:
//!
//! ```text
//! man,men,guy,gentleman
//! wearing,wears,is wearing,wearing a
//! ```
//!
//! Every word of every category on a line points back at the whole line, so
//! `is wearing` is reachable from `wearing` and vice versa. The closure of a
//! seed set follows those links until nothing new appears.
//!
//! # Example
//!
//! ```rust
//! use vgrel::synonyms::AliasMap;
//!
//! let aliases = AliasMap::parse("man,guy\nguy,dude\n");
//! assert_eq!(aliases.closure(&["man"]), vec!["dude", "guy", "man"]);
//! ```

use crate::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

/// Default object alias file, relative to the working directory.
pub const DEFAULT_OBJECT_ALIAS_FILE: &str = "data/VisualGenome/object_alias.txt";

/// Default predicate alias file, relative to the working directory.
pub const DEFAULT_PREDICATE_ALIAS_FILE: &str = "data/VisualGenome/relationship_alias.txt";

// =============================================================================
// AliasMap
// =============================================================================

/// Word → every category listed on a line where that word occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    map: HashMap<String, Vec<String>>,
}

impl AliasMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse alias file contents.
    ///
    /// Blank lines are skipped and categories are trimmed; empty categories
    /// (from `a,,b`) are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for line in text.lines() {
            let cats: Vec<String> = line
                .trim()
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            for cat in &cats {
                for word in cat.split_whitespace() {
                    map.entry(word.to_string())
                        .or_default()
                        .extend(cats.iter().cloned());
                }
            }
        }
        Self { map }
    }

    /// Read and parse an alias file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
        let aliases = Self::parse(&text);
        log::debug!("Loaded {} alias words from {:?}", aliases.len(), path);
        Ok(aliases)
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no aliases were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Categories gathered for a single word.
    #[must_use]
    pub fn aliases_of(&self, word: &str) -> Option<&[String]> {
        self.map.get(word).map(Vec::as_slice)
    }

    /// Synonym closure of `seeds`, sorted and deduplicated.
    ///
    /// The result always contains the seeds, including a seed with no alias
    /// entry (`closure(["zebra"]) == ["zebra"]`), where a lookup that only
    /// reports names reached through the aliases would return nothing.
    ///
    /// Each round looks up every word of the categories discovered in the
    /// previous round; the loop ends when a round discovers nothing, which
    /// must happen because every discovered name is an alias value and there
    /// are finitely many.
    #[must_use]
    pub fn closure<S: AsRef<str>>(&self, seeds: &[S]) -> Vec<String> {
        let mut seen: BTreeSet<String> = seeds.iter().map(|s| s.as_ref().to_string()).collect();
        let mut frontier: Vec<String> = seen.iter().cloned().collect();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for cat in &frontier {
                for word in cat.split_whitespace() {
                    let Some(aliases) = self.map.get(word) else {
                        continue;
                    };
                    for alias in aliases {
                        if seen.insert(alias.clone()) {
                            next.push(alias.clone());
                        }
                    }
                }
            }
            frontier = next;
        }

        seen.into_iter().collect()
    }
}

// =============================================================================
// SimilarCategories
// =============================================================================

/// Object and predicate alias maps side by side.
#[derive(Debug, Clone, Default)]
pub struct SimilarCategories {
    /// Aliases for object/subject names.
    pub object_alias: AliasMap,
    /// Aliases for predicates.
    pub predicate_alias: AliasMap,
}

impl SimilarCategories {
    /// Load both alias files.
    pub fn new(object_alias_file: impl AsRef<Path>, predicate_alias_file: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            object_alias: AliasMap::from_file(object_alias_file)?,
            predicate_alias: AliasMap::from_file(predicate_alias_file)?,
        })
    }

    /// Load the alias files from their default locations.
    pub fn from_default_files() -> Result<Self> {
        Self::new(DEFAULT_OBJECT_ALIAS_FILE, DEFAULT_PREDICATE_ALIAS_FILE)
    }

    /// Build from already-parsed maps.
    #[must_use]
    pub fn from_maps(object_alias: AliasMap, predicate_alias: AliasMap) -> Self {
        Self {
            object_alias,
            predicate_alias,
        }
    }

    /// Closure of `seeds` under the object aliases.
    #[must_use]
    pub fn get_similar_objects<S: AsRef<str>>(&self, seeds: &[S]) -> Vec<String> {
        self.object_alias.closure(seeds)
    }

    /// Closure of `seeds` under the predicate aliases.
    #[must_use]
    pub fn get_similar_predicates<S: AsRef<str>>(&self, seeds: &[S]) -> Vec<String> {
        self.predicate_alias.closure(seeds)
    }

    /// One table entry per canonical object, holding its closure.
    #[must_use]
    pub fn object_synonyms<S: AsRef<str>>(&self, canonicals: &[S]) -> SynonymTable {
        SynonymTable::from_closures(&self.object_alias, canonicals)
    }

    /// One table entry per canonical predicate, holding its closure.
    #[must_use]
    pub fn predicate_synonyms<S: AsRef<str>>(&self, canonicals: &[S]) -> SynonymTable {
        SynonymTable::from_closures(&self.predicate_alias, canonicals)
    }
}

// =============================================================================
// SynonymTable
// =============================================================================

/// Canonical name → synonyms.
///
/// Entries keep the order in which canonicals were given; lookups that can
/// match several entries resolve to the earliest one. Serializes as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
}

impl SynonymTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table whose entry for each canonical is `aliases.closure([canonical])`,
    /// in the order of `canonicals`.
    #[must_use]
    pub fn from_closures<S: AsRef<str>>(aliases: &AliasMap, canonicals: &[S]) -> Self {
        canonicals
            .iter()
            .map(|c| {
                let c = c.as_ref();
                (c.to_string(), aliases.closure(&[c]))
            })
            .collect()
    }

    /// Insert an entry, or replace the synonyms of an existing one in place.
    pub fn insert(&mut self, canonical: impl Into<String>, synonyms: Vec<String>) {
        let canonical = canonical.into();
        match self.entries.iter_mut().find(|(k, _)| *k == canonical) {
            Some((_, syns)) => *syns = synonyms,
            None => self.entries.push((canonical, synonyms)),
        }
    }

    /// Synonyms of a canonical name.
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == canonical)
            .map(|(_, v)| v.as_slice())
    }

    /// Canonical names in table order.
    pub fn canonicals(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(canonical, synonyms)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of canonical entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First canonical whose synonym list contains `name`.
    pub fn find_canonical(&self, name: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|(_, syns)| syns.iter().any(|s| s == name))
            .map(|(k, _)| k.as_str())
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// Synonym → canonical. A synonym shared by several entries maps to the
    /// first of them.
    #[must_use]
    pub fn invert(&self) -> HashMap<String, String> {
        let mut inverted = HashMap::new();
        for (canonical, syns) in &self.entries {
            for syn in syns {
                inverted
                    .entry(syn.clone())
                    .or_insert_with(|| canonical.clone());
            }
        }
        inverted
    }

    /// Union of all synonym lists.
    #[must_use]
    pub fn all_names(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|(_, v)| v.iter())
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, Vec<String>)> for SynonymTable {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (canonical, synonyms) in iter {
            table.insert(canonical, synonyms);
        }
        table
    }
}

impl Serialize for SynonymTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for SynonymTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SynonymTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of canonical name to synonym list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut table = SynonymTable::new();
                while let Some((canonical, synonyms)) = access.next_entry::<String, Vec<String>>()? {
                    table.insert(canonical, synonyms);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
