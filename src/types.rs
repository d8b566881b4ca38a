/// How row ids are minted during population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScope {
    /// Each table counts its own rows from 1, so `id` is that table's primary key
    #[default]
    PerTable,

    /// One counter for the whole walk. Nested objects take the next value
    /// when descended into; array element rows use their 1-based position
    /// within the array instance.
    Global,
}

/// Configuration shared by the inference and population passes
#[derive(Debug, Clone)]
pub struct SmeltConfig {
    /// Context name of the document root (sanitized before use)
    pub root_table: String,

    /// Row id discipline
    pub id_scope: IdScope,

    /// Containers nested deeper than this are skipped by both passes
    pub max_depth: usize,
}

impl Default for SmeltConfig {
    fn default() -> Self {
        SmeltConfig {
            root_table: String::from("root"),
            id_scope: IdScope::PerTable,
            max_depth: 128,
        }
    }
}

impl SmeltConfig {
    pub fn with_id_scope(mut self, id_scope: IdScope) -> Self {
        self.id_scope = id_scope;
        self
    }

    pub fn with_root_table(mut self, root_table: impl Into<String>) -> Self {
        self.root_table = root_table.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
