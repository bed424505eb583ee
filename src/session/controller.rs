use crate::model::{EntityKind, FieldMap, FieldValue, FormMode, Record, slugify};

const SLUG: &str = "slug";

/// Whether the slug follows the title or was typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Derivation {
    #[default]
    Auto,
    Manual,
}

/// Owns a form's field mapping and keeps derived fields in step with it.
#[derive(Debug, Clone)]
pub struct FormController {
    kind: EntityKind,
    mode: FormMode,
    values: FieldMap,
    slug: Derivation,
}

impl FormController {
    /// An empty create form.
    pub fn create(kind: EntityKind) -> Self {
        Self {
            kind,
            mode: FormMode::Create,
            values: FieldMap::empty(kind.fields()),
            slug: Derivation::Auto,
        }
    }

    /// An update form populated from a stored record.
    ///
    /// The slug keeps following the title only if it still matches it.
    pub fn update(record: &Record) -> Self {
        let kind = record.kind();
        let values = record.to_fields();
        let slug = if values.text(SLUG) == slugify(values.text(kind.title_field())) {
            Derivation::Auto
        } else {
            Derivation::Manual
        };
        Self {
            kind,
            mode: FormMode::Update(record.id().to_string()),
            values,
            slug,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn values(&self) -> &FieldMap {
        &self.values
    }

    pub fn derivation(&self) -> Derivation {
        self.slug
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.values.text(name)
    }

    /// Writes a field as-is and recomputes whatever depends on it.
    pub fn set(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.values.set(name, value);

        if name == SLUG {
            self.slug = Derivation::Manual;
        } else if name == self.kind.title_field() && self.slug == Derivation::Auto {
            let slug = slugify(self.values.text(name));
            self.values.set(SLUG, slug);
        }
        self.kind.derive_dependents(name, &mut self.values);
    }

    /// Puts the slug back under title control and re-derives it.
    pub fn follow_title(&mut self) {
        self.slug = Derivation::Auto;
        let slug = slugify(self.values.text(self.kind.title_field()));
        self.values.set(SLUG, slug);
    }

    /// Restores the empty shape.
    pub fn reset(&mut self) {
        self.values = FieldMap::empty(self.kind.fields());
        self.slug = Derivation::Auto;
    }
}
