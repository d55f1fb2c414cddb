//! Resource naming: singular/plural forms and every identifier derived from them.
//!
//! Generated names are deterministic so that code written against a module
//! (`fetchUsers`, `SET_USERS`, `currentUser`...) can rely on them.

use crate::model::ActionKind;

/// English singular/plural conversion used to derive resource names.
pub struct Pluralizer;

// (singular, plural). Irregular nouns, plus regular ones whose plural the suffix
// rules cannot undo (`caches` is not `cach` + `es`). Matched on the last word.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("cache", "caches"),
    ("size", "sizes"),
    ("shoe", "shoes"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("drive", "drives"),
    ("archive", "archives"),
    ("move", "moves"),
    ("status", "statuses"),
    ("bus", "buses"),
    ("alias", "aliases"),
];

/// Splits off the last word of a camelCase, snake_case or kebab-case name:
/// `blogPost` -> (`blog`, `Post`).
fn split_last_word(s: &str) -> (&str, &str) {
    let start = s
        .char_indices()
        .skip(1)
        .filter_map(|(i, c)| match c {
            '_' | '-' => Some(i + 1),
            c if c.is_uppercase() => Some(i),
            _ => None,
        })
        .last()
        .unwrap_or(0);
    s.split_at(start)
}

/// Looks the last word of `s` up in the table and swaps it for the other form:
/// the singular when `from_plural`, else the plural.
fn irregular(s: &str, from_plural: bool) -> Option<String> {
    let (head, word) = split_last_word(s);
    let lower = word.to_lowercase();
    let (singular, plural) = IRREGULAR.iter().find(|(singular, plural)| {
        lower == *singular || lower == *plural
    })?;
    let replacement = if from_plural { singular } else { plural };
    let replacement = if word.starts_with(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    };
    Some(format!("{}{}", head, replacement))
}

impl Pluralizer {
    /// Convert a singular noun to its plural form.
    ///
    /// ```
    /// use crud_store::model::Pluralizer;
    ///
    /// assert_eq!(Pluralizer::pluralize("user"), "users");
    /// assert_eq!(Pluralizer::pluralize("category"), "categories");
    /// assert_eq!(Pluralizer::pluralize("address"), "addresses");
    /// ```
    pub fn pluralize(singular: &str) -> String {
        if singular.is_empty() {
            return String::new();
        }
        if let Some(plural) = irregular(singular, false) {
            return plural;
        }

        match singular {
            s if s.len() > 1 && s.ends_with('y') && !ends_with_vowel_y(s) => {
                format!("{}ies", &s[..s.len() - 1])
            }
            s if ["s", "sh", "ch", "x", "z"].iter().any(|e| s.ends_with(e)) => format!("{}es", s),
            s if s.len() > 2 && s.ends_with("fe") => format!("{}ves", &s[..s.len() - 2]),
            s if s.len() > 1 && s.ends_with('f') && !s.ends_with("ff") => {
                format!("{}ves", &s[..s.len() - 1])
            }
            s if s.len() > 1 && s.ends_with('o') => {
                let before = s[..s.len() - 1].chars().last();
                if matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u'))
                    || matches!(s, "photo" | "piano" | "halo" | "memo" | "logo")
                {
                    format!("{}s", s)
                } else {
                    format!("{}es", s)
                }
            }
            s => format!("{}s", s),
        }
    }

    /// Convert a plural noun to its singular form. Words that do not look plural
    /// are returned unchanged.
    pub fn singularize(plural: &str) -> String {
        if plural.is_empty() {
            return String::new();
        }
        if let Some(singular) = irregular(plural, true) {
            return singular;
        }

        match plural {
            s if s.len() > 3 && s.ends_with("ies") => format!("{}y", &s[..s.len() - 3]),
            s if s.len() > 3 && s.ends_with("ives") => format!("{}ife", &s[..s.len() - 4]),
            s if s.len() > 3 && s.ends_with("ves") => format!("{}f", &s[..s.len() - 3]),
            s if s.len() > 3
                && ["sses", "shes", "ches", "xes", "zes", "oes"]
                    .iter()
                    .any(|e| s.ends_with(e)) =>
            {
                s[..s.len() - 2].to_string()
            }
            s if s.len() > 1 && s.ends_with('s') && !s.ends_with("ss") => {
                s[..s.len() - 1].to_string()
            }
            s => s.to_string(),
        }
    }
}

fn ends_with_vowel_y(s: &str) -> bool {
    ["ay", "ey", "iy", "oy", "uy"].iter().any(|e| s.ends_with(e))
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `blogPosts` -> `BLOG_POSTS`, `users` -> `USERS`, `userIDs` -> `USER_IDS`.
///
/// A run of capitals is one word. It only ends early when a capital starts a
/// longer lowercase word (`HTTPServer` -> `HTTP_SERVER`).
pub fn to_upper_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let lower_run = chars[i + 1..].iter().take_while(|c| c.is_lowercase()).count();
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && lower_run > 1) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}

/// Singular and plural forms of a resource. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    name: String,
    singular: String,
    plural: String,
}

impl ResourceDescriptor {
    /// Derive the forms from a resource name, which may be given singular or plural.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let singular = Pluralizer::singularize(&name);
        let plural = Pluralizer::pluralize(&singular);
        Self {
            name,
            singular,
            plural,
        }
    }

    /// The name exactly as given; used as the URL segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }
}

/// Identifiers generated for one [`ActionKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNames {
    /// e.g. `fetchUsers`
    pub action: String,
    /// e.g. `fetchUsersLoading`
    pub loading_key: String,
    /// e.g. `SET_FETCH_USERS_LOADING`
    pub loading_mutation: String,
    /// The mutation committed with the response, e.g. `SET_USERS`.
    pub mutation: String,
}

/// Every generated identifier for a resource, computed once by [`derive_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// `users`
    pub items_key: String,
    /// `currentUser`
    pub current_key: String,
    pub set_items: String,
    pub set_current: String,
    pub add_item: String,
    pub update_item: String,
    pub delete_item: String,
    actions: [ActionNames; 5],
}

impl ResourceNames {
    pub fn for_kind(&self, kind: ActionKind) -> &ActionNames {
        &self.actions[kind.index()]
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionKind, &ActionNames)> {
        ActionKind::ALL.into_iter().map(move |k| (k, self.for_kind(k)))
    }
}

pub fn derive_names(resource: &ResourceDescriptor) -> ResourceNames {
    let singular = capitalize(resource.singular());
    let plural = capitalize(resource.plural());
    let upper_singular = to_upper_snake(resource.singular());
    let upper_plural = to_upper_snake(resource.plural());

    let set_items = format!("SET_{}", upper_plural);
    let set_current = format!("SET_CURRENT_{}", upper_singular);
    let add_item = format!("ADD_{}", upper_singular);
    let update_item = format!("UPDATE_{}", upper_singular);
    let delete_item = format!("DELETE_{}", upper_singular);

    let action_names = |kind: ActionKind| {
        let (verb, noun, mutation) = match kind {
            ActionKind::FetchItems => ("fetch", &plural, &set_items),
            ActionKind::GetItem => ("get", &singular, &set_current),
            ActionKind::CreateItem => ("create", &singular, &add_item),
            ActionKind::UpdateItem => ("update", &singular, &update_item),
            ActionKind::DeleteItem => ("delete", &singular, &delete_item),
        };
        let action = format!("{}{}", verb, noun);
        ActionNames {
            loading_key: format!("{}Loading", action),
            loading_mutation: format!("SET_{}_LOADING", to_upper_snake(&action)),
            mutation: mutation.clone(),
            action,
        }
    };
    let actions = ActionKind::ALL.map(action_names);

    ResourceNames {
        items_key: resource.plural().to_lowercase(),
        current_key: format!("current{}", singular),
        set_items,
        set_current,
        add_item,
        update_item,
        delete_item,
        actions,
    }
}
