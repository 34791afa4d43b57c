//! Candidate-name catalog: TSV parsing, per-set load state, and the merged frequency-sorted view.

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Which candidate list a name belongs to. Single-word names are "simple",
/// names containing a space, period, or hyphen are "complex".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetTag {
    Simple,
    Complex,
}

impl SetTag {
    pub const ALL: [SetTag; 2] = [SetTag::Simple, SetTag::Complex];

    /// Directory name under `data/` holding this set's per-name series files.
    pub fn data_dir(&self) -> &'static str {
        match self {
            SetTag::Simple => "simple",
            SetTag::Complex => "complex",
        }
    }

    /// Candidate-list resource name under `data/`.
    pub fn catalog_resource(&self) -> &'static str {
        match self {
            SetTag::Simple => "namesSimple.tsv",
            SetTag::Complex => "namesComplex.tsv",
        }
    }

    /// Set-toggle label shown next to the switch (original UI wording).
    pub fn label(&self) -> &'static str {
        match self {
            SetTag::Simple => "Jednoslovná jména, např. Marie",
            SetTag::Complex => "Složená jména, např. Anna Marie",
        }
    }
}

/// Canonical identity of a name: per-set load ordinal plus set tag.
/// `id` is the row position in the TSV resource, not any sorted position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub id: u32,
    pub set: SetTag,
}

/// One candidate name. `stable_index` is assigned at load time and never changes;
/// it is the join key for selection entries and series resources.
#[derive(Debug, Clone)]
pub struct NameRecord {
    pub display_name: String,
    pub frequency: u64,
    pub stable_index: u32,
    pub set: SetTag,
    /// Lowercased display name, precomputed so per-keystroke filtering
    /// does not re-lowercase tens of thousands of rows.
    pub lower_name: String,
}

impl NameRecord {
    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            id: self.stable_index,
            set: self.set,
        }
    }
}

/// Parse a candidate-list TSV: one row per name, columns `[displayName, frequency]`,
/// no header. Row position becomes `stable_index`. Blank lines are skipped but
/// still a malformed row is an error (a half-parsed catalog would misstate totals).
pub fn parse_catalog_tsv(text: &str, set: SetTag) -> Result<Vec<NameRecord>> {
    let mut records = Vec::new();
    for (row, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut cols = line.split('\t');
        let name = cols
            .next()
            .ok_or_else(|| eyre!("row {}: missing name column", row))?;
        let freq_str = cols
            .next()
            .ok_or_else(|| eyre!("row {}: missing frequency column", row))?;
        let frequency: u64 = freq_str
            .trim()
            .parse()
            .map_err(|_| eyre!("row {}: invalid frequency '{}'", row, freq_str))?;
        records.push(NameRecord {
            display_name: name.to_string(),
            frequency,
            stable_index: records.len() as u32,
            set,
            lower_name: name.to_lowercase(),
        });
    }
    Ok(records)
}

/// Load state of one candidate list.
#[derive(Debug, Default)]
enum SetState {
    #[default]
    Pending,
    Loaded(Vec<NameRecord>),
    Failed(String),
}

/// Holds the two immutable candidate lists and the set-visibility toggles.
/// The combined catalog is not usable until both lists have loaded.
#[derive(Debug, Default)]
pub struct NameCatalog {
    simple: SetState,
    complex: SetState,
    pub show_simple: bool,
    pub show_complex: bool,
}

impl NameCatalog {
    pub fn new() -> Self {
        // Simple names on, complex names off by default.
        Self {
            simple: SetState::Pending,
            complex: SetState::Pending,
            show_simple: true,
            show_complex: false,
        }
    }

    fn state(&self, set: SetTag) -> &SetState {
        match set {
            SetTag::Simple => &self.simple,
            SetTag::Complex => &self.complex,
        }
    }

    fn state_mut(&mut self, set: SetTag) -> &mut SetState {
        match set {
            SetTag::Simple => &mut self.simple,
            SetTag::Complex => &mut self.complex,
        }
    }

    /// Install a loaded candidate list. Records are immutable afterwards.
    pub fn install(&mut self, set: SetTag, records: Vec<NameRecord>) {
        *self.state_mut(set) = SetState::Loaded(records);
    }

    /// Record a load failure. The set stays unusable; no retry is attempted.
    pub fn mark_failed(&mut self, set: SetTag, error: String) {
        *self.state_mut(set) = SetState::Failed(error);
    }

    pub fn is_loaded(&self, set: SetTag) -> bool {
        matches!(self.state(set), SetState::Loaded(_))
    }

    pub fn failure(&self, set: SetTag) -> Option<&str> {
        match self.state(set) {
            SetState::Failed(e) => Some(e.as_str()),
            _ => None,
        }
    }

    /// The combined catalog is usable only once both lists have loaded.
    pub fn ready(&self) -> bool {
        self.is_loaded(SetTag::Simple) && self.is_loaded(SetTag::Complex)
    }

    pub fn records(&self, set: SetTag) -> &[NameRecord] {
        match self.state(set) {
            SetState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn show(&self, set: SetTag) -> bool {
        match set {
            SetTag::Simple => self.show_simple,
            SetTag::Complex => self.show_complex,
        }
    }

    pub fn set_show(&mut self, set: SetTag, show: bool) {
        match set {
            SetTag::Simple => self.show_simple = show,
            SetTag::Complex => self.show_complex = show,
        }
    }

    /// Look up a record by its canonical key.
    pub fn lookup(&self, key: SelectionKey) -> Option<&NameRecord> {
        self.records(key.set).get(key.id as usize)
    }

    /// Candidate list for display: concatenation of the enabled sets re-sorted
    /// by descending frequency. The sort is stable, so frequency ties keep the
    /// concatenation order (ascending `stable_index` within a set).
    pub fn merged_view(&self) -> Vec<NameRecord> {
        let mut view = Vec::new();
        for set in SetTag::ALL {
            if self.show(set) {
                view.extend_from_slice(self.records(set));
            }
        }
        view.sort_by_key(|r| std::cmp::Reverse(r.frequency));
        view
    }
}
