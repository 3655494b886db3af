use crate::{climb::Climb, context::View, slug::slugify};
use log::warn;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const INDEX_HTML: &str = "index.html";

/// A symbolic link to create: `path` points at `target`, relative to `path`'s directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub path: String,
    pub target: String,
}

/// Redirects that make `alias` serve the pages of `canonical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRedirect {
    pub alias: String,
    pub canonical: String,
    pub redirects: Vec<Redirect>,
}

impl AliasRedirect {
    pub fn new(alias: String, canonical: String) -> Self {
        let mut redirects = vec![Redirect {
            path: format!("{alias}/{INDEX_HTML}"),
            target: format!("../{canonical}/{INDEX_HTML}"),
        }];
        for view in View::ALL {
            let dir = view.dir();
            redirects.push(Redirect {
                path: format!("{alias}/{dir}/{INDEX_HTML}"),
                target: format!("../../{canonical}/{dir}/{INDEX_HTML}"),
            });
        }
        AliasRedirect {
            alias,
            canonical,
            redirects,
        }
    }
}

/// The `index.html` of a page directory, resolving to its default view.
pub fn index_redirect(dir: &str, default_view: View) -> Redirect {
    let path = if dir.is_empty() {
        INDEX_HTML.to_string()
    } else {
        format!("{dir}/{INDEX_HTML}")
    };
    Redirect {
        path,
        target: format!("{}/{INDEX_HTML}", default_view.dir()),
    }
}

/// Canonical climb slugs and the alias slugs that redirect to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AliasMap {
    pub canonical: Vec<String>,
    pub aliases: Vec<AliasRedirect>,
}

impl AliasMap {
    /// Canonical slug addressed by `slug`, whether it is canonical or an alias.
    pub fn resolve(&self, slug: &str) -> Option<&str> {
        if let Some(canonical) = self.canonical.iter().find(|c| *c == slug) {
            return Some(canonical.as_str());
        }
        self.aliases
            .iter()
            .find(|a| a.alias == slug)
            .map(|a| a.canonical.as_str())
    }

    /// Alias slug to canonical slug.
    pub fn mapping(&self) -> BTreeMap<&str, &str> {
        self.aliases
            .iter()
            .map(|a| (a.alias.as_str(), a.canonical.as_str()))
            .collect()
    }
}

/// Collect alias redirects for every climb.
///
/// Each climb's own name, segment name and aliases are slugified; slugs equal
/// to the climb's canonical slug or already seen are skipped. A slug claimed by
/// another climb stays with the first claimant.
pub fn resolve_aliases<'a>(climbs: impl IntoIterator<Item = &'a Climb>) -> AliasMap {
    let climbs: Vec<&Climb> = climbs.into_iter().collect();
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut map = AliasMap::default();

    for climb in &climbs {
        let canonical = climb.slug();
        if let Some(owner) = owners.get(&canonical) {
            warn!("{}: canonical slug {canonical} already used by {owner}", climb.name);
            continue;
        }
        owners.insert(canonical.clone(), canonical.clone());
        map.canonical.push(canonical);
    }

    for climb in &climbs {
        let canonical = climb.slug();
        for name in climb.names() {
            let alias = slugify(name);
            if alias.is_empty() || alias == canonical {
                continue;
            }
            match owners.get(&alias) {
                Some(owner) if *owner == canonical => continue,
                Some(owner) => {
                    warn!(
                        "{}: alias {alias} ({name}) already resolves to {owner}, skipping",
                        climb.name
                    );
                    continue;
                }
                None => {}
            }
            owners.insert(alias.clone(), canonical.clone());
            map.aliases.push(AliasRedirect::new(alias, canonical.clone()));
        }
    }
    map
}
