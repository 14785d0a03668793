/// Most overrides a single note can carry.
pub const MAX_NOTE_PARAMS: usize = 12;

/// One named, ranged voice parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

/// The parameters a voice declared in `init`.
///
/// Declared once when the voice is created; after that only values change,
/// so resetting and applying overrides never allocates.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    params: Vec<Param>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter. Redeclaring a name replaces it.
    pub fn declare(&mut self, name: &'static str, default: f32, min: f32, max: f32) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let param = Param {
            name,
            default,
            min,
            max,
            value: default.clamp(min, max),
        };
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Current value, or 0.0 for an undeclared name.
    pub fn value(&self, name: &str) -> f32 {
        self.get(name).map_or(0.0, |p| p.value)
    }

    /// Write a value clamped to the parameter's range. Returns `false` for
    /// an undeclared name.
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(param) => {
                param.value = value.clamp(param.min, param.max);
                true
            }
            None => false,
        }
    }

    /// Restore every value to its default.
    pub fn reset(&mut self) {
        for param in &mut self.params {
            param.value = param.default.clamp(param.min, param.max);
        }
    }

    /// Apply note overrides; returns how many names were recognized.
    pub fn apply(&mut self, overrides: &NoteParams) -> usize {
        overrides
            .iter()
            .filter(|&(name, value)| self.set(name, value))
            .count()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }
}

/// Per-note parameter overrides.
///
/// Fixed capacity and `Copy` so a note can travel through the control ring
/// and the event queue without touching the allocator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteParams {
    entries: [(&'static str, f32); MAX_NOTE_PARAMS],
    len: usize,
}

impl Default for NoteParams {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteParams {
    pub const fn new() -> Self {
        Self {
            entries: [("", 0.0); MAX_NOTE_PARAMS],
            len: 0,
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &'static str, value: f32) -> Self {
        self.set(name, value);
        self
    }

    /// Set or replace an override. Returns `false` when the list is full
    /// and `name` is not already present.
    pub fn set(&mut self, name: &'static str, value: f32) -> bool {
        if let Some(entry) = self.entries[..self.len].iter_mut().find(|e| e.0 == name) {
            entry.1 = value;
            return true;
        }
        if self.len == MAX_NOTE_PARAMS {
            return false;
        }
        self.entries[self.len] = (name, value);
        self.len += 1;
        true
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.iter().find(|&(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.entries[..self.len].iter().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> From<[(&'static str, f32); N]> for NoteParams {
    fn from(entries: [(&'static str, f32); N]) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |params, (name, value)| params.with(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ParamSet {
        let mut params = ParamSet::new();
        params.declare("amplitude", 0.3, 0.0, 1.0);
        params.declare("frequency", 60.0, 20.0, 5000.0);
        params
    }

    #[test]
    fn overrides_are_clamped_and_unknown_names_ignored() {
        let mut params = set();
        let overrides = NoteParams::new()
            .with("frequency", 10_000.0)
            .with("amplitude", 0.5)
            .with("wobble", 3.0);

        assert_eq!(params.apply(&overrides), 2);
        assert_eq!(params.value("frequency"), 5000.0);
        assert_eq!(params.value("amplitude"), 0.5);
        assert!(params.get("wobble").is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut params = set();
        params.set("amplitude", 0.9);
        params.reset();
        assert_eq!(params.value("amplitude"), 0.3);
    }

    #[test]
    fn note_params_replace_and_cap() {
        let mut note = NoteParams::new().with("frequency", 440.0);
        note.set("frequency", 220.0);
        assert_eq!(note.len(), 1);
        assert_eq!(note.get("frequency"), Some(220.0));

        const NAMES: [&str; MAX_NOTE_PARAMS] =
            ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"];
        let mut full = NoteParams::new();
        for name in NAMES {
            assert!(full.set(name, 1.0));
        }
        assert!(!full.set("overflow", 1.0));
        assert!(full.set("a", 2.0));
        assert_eq!(full.get("a"), Some(2.0));
    }

    #[test]
    fn from_array() {
        let note = NoteParams::from([("frequency", 440.0), ("amplitude", 0.2)]);
        assert_eq!(note.len(), 2);
        assert_eq!(note.get("amplitude"), Some(0.2));
    }
}
