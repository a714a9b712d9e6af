//! Named catalog scenarios. Each one builds its inputs from a seed and
//! checks the engine's invariants against a headless surface.
use anyhow::{Context, Result, bail, ensure};
use floreria_catalog::{
    CardActions, CardControl, CatalogConfig, CatalogController, Gallery, HeadlessSurface,
    IdGenerator, KeyOutcome, ModalKey, ModalNavigator, Navigation, NodeId, Product, ProductDraft,
    ProductPatch, featured_products, filter_buttons, funeral_catalog, gallery_actions,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const CATEGORIES: [&str; 4] = ["ramos", "coronas", "cruces", "plantas"];
const WORDS: [&str; 6] = ["Rosa", "Lirio", "Girasol", "Orquidea", "Clavel", "Tulipan"];

pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(u64) -> Result<()>,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "smoke",
        description: "Mount the featured storefront and check the first render",
        run: smoke,
    },
    Scenario {
        name: "category-filter",
        description: "Category filter selects exactly the matching products",
        run: category_filter,
    },
    Scenario {
        name: "search",
        description: "Case-insensitive search over name, description and category",
        run: search,
    },
    Scenario {
        name: "remove-idempotence",
        description: "Removing a product twice equals removing it once",
        run: remove_idempotence,
    },
    Scenario {
        name: "add-remove-roundtrip",
        description: "Adding then removing a product restores the list",
        run: add_remove_roundtrip,
    },
    Scenario {
        name: "mutation-sync",
        description: "Random add/remove/update keeps cards equal to the visible set",
        run: mutation_sync,
    },
    Scenario {
        name: "modal-clamping",
        description: "Lightbox navigation stays inside the filtered sequence",
        run: modal_clamping,
    },
    Scenario {
        name: "gallery-flow",
        description: "Funeral gallery filter, quick view and keyboard flow",
        run: gallery_flow,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.name, s.description))
}

pub fn get_scenario(name: &str) -> Option<&'static Scenario> {
    let name = name.to_lowercase();
    SCENARIOS.iter().find(|s| s.name == name)
}

pub fn all_scenario_names() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.name.to_string()).collect()
}

fn pick<'a>(rng: &mut ChaCha20Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or("rosa")
}

fn random_drafts(rng: &mut ChaCha20Rng, len: usize) -> Vec<ProductDraft> {
    (0..len)
        .map(|idx| {
            let mut draft = ProductDraft::named(format!("{} {idx}", pick(rng, &WORDS)))
                .with_description(format!("Arreglo de {}", pick(rng, &WORDS).to_lowercase()));
            if rng.gen_bool(0.85) {
                draft = draft.with_category(pick(rng, &CATEGORIES));
            }
            if rng.gen_bool(0.3) {
                draft = draft.with_price(format!("{}", rng.gen_range(300..4_000)));
            }
            draft
        })
        .collect()
}

fn headless(drafts: Vec<ProductDraft>, seed: u64) -> CatalogController<HeadlessSurface> {
    CatalogController::mount_with_ids(
        CatalogConfig::new("catalog", drafts),
        CardActions::new(),
        HeadlessSurface::with_container("catalog"),
        IdGenerator::seeded(seed),
    )
}

fn check_synchronized(c: &CatalogController<HeadlessSurface>) -> Result<()> {
    let visible: Vec<&str> = c.visible().iter().map(|p| p.id.as_str()).collect();
    let rendered = c.surface().card_ids();
    ensure!(
        visible == rendered,
        "rendered cards {rendered:?} differ from visible order {visible:?}"
    );
    ensure!(
        c.empty_state_shown() == visible.is_empty(),
        "empty state shown={} with {} visible products",
        c.empty_state_shown(),
        visible.len()
    );
    Ok(())
}

fn smoke(_seed: u64) -> Result<()> {
    let c = headless(featured_products().to_vec(), 0);
    ensure!(c.is_mounted(), "featured grid failed to mount");
    ensure!(
        c.rendered_count() == featured_products().len(),
        "expected {} cards, rendered {}",
        featured_products().len(),
        c.rendered_count()
    );
    ensure!(c.surface().decoration().is_some(), "grid container not decorated");
    check_synchronized(&c)
}

fn category_filter(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let len = rng.gen_range(0..40);
    let mut c = headless(random_drafts(&mut rng, len), seed);
    let category = pick(&mut rng, &CATEGORIES);
    c.set_filter(category);
    if let Some(stray) = c
        .visible()
        .iter()
        .find(|p| p.category.as_deref() != Some(category))
    {
        bail!("product {:?} visible under filter {category:?}", stray.id);
    }
    let expected = c
        .products()
        .iter()
        .filter(|p| p.category.as_deref() == Some(category))
        .count();
    ensure!(
        c.visible().len() == expected,
        "filter {category:?} shows {} of {expected}",
        c.visible().len()
    );
    c.set_filter("all");
    ensure!(c.visible().len() == c.products().len(), "\"all\" hid products");
    check_synchronized(&c)
}

fn search(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut c = headless(random_drafts(&mut rng, 30), seed);
    let word = pick(&mut rng, &WORDS);
    let term = if rng.gen_bool(0.5) {
        word.to_uppercase()
    } else {
        word.to_lowercase()
    };
    c.set_search(&term);
    let needle = term.to_lowercase();
    for product in c.visible() {
        let hit = product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
            || product
                .category
                .as_deref()
                .is_some_and(|cat| cat.to_lowercase().contains(&needle));
        ensure!(hit, "product {:?} visible without matching {term:?}", product.id);
    }
    c.set_search("");
    ensure!(c.visible().len() == c.products().len(), "empty search hid products");
    check_synchronized(&c)
}

fn remove_idempotence(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let drafts = random_drafts(&mut rng, 12);
    let mut once = headless(drafts.clone(), seed);
    let mut twice = headless(drafts, seed);
    let target = once
        .products()
        .choose(&mut rng)
        .map(|p| p.id.clone())
        .context("generated catalog is empty")?;

    once.remove(&target);
    twice.remove(&target);
    twice.remove(&target);
    ensure!(once.products() == twice.products(), "product lists diverged");
    ensure!(
        once.surface().card_ids() == twice.surface().card_ids(),
        "rendered cards diverged"
    );
    check_synchronized(&twice)
}

fn add_remove_roundtrip(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut c = headless(random_drafts(&mut rng, 10), seed);
    c.set_filter(pick(&mut rng, &CATEGORIES));
    let before = c.products().to_vec();
    let extra = random_drafts(&mut rng, 1)
        .pop()
        .context("no draft generated")?;
    let id = c.add(extra);
    ensure!(c.product(&id).is_some(), "added product {id:?} missing");
    c.remove(&id);
    ensure!(c.products() == before.as_slice(), "product list not restored");
    check_synchronized(&c)
}

fn mutation_sync(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut c = headless(random_drafts(&mut rng, 8), seed);
    for step in 0..50 {
        match rng.gen_range(0..5) {
            0 => c.set_filter(pick(&mut rng, &CATEGORIES)),
            1 => c.set_search(if rng.gen_bool(0.5) { "" } else { "ro" }),
            2 => {
                for draft in random_drafts(&mut rng, 1) {
                    c.add(draft);
                }
            }
            3 => {
                if let Some(id) = c.products().choose(&mut rng).map(|p| p.id.clone()) {
                    c.remove(&id);
                }
            }
            _ => {
                if let Some(id) = c.products().choose(&mut rng).map(|p| p.id.clone()) {
                    let patch = ProductPatch {
                        category: Some(pick(&mut rng, &CATEGORIES).to_string()),
                        ..ProductPatch::default()
                    };
                    c.update(&id, &patch);
                }
            }
        }
        check_synchronized(&c).with_context(|| format!("after step {step}"))?;
    }
    Ok(())
}

fn modal_clamping(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let len = rng.gen_range(1..12);
    let sequence = headless(random_drafts(&mut rng, len), seed).products().to_vec();
    let start = sequence
        .choose(&mut rng)
        .map(|p| p.id.clone())
        .context("empty sequence")?;

    let mut modal = ModalNavigator::new();
    modal.open(sequence, &start);
    for _ in 0..40 {
        let key = if rng.gen_bool(0.5) {
            ModalKey::ArrowLeft
        } else {
            ModalKey::ArrowRight
        };
        let before = modal.current_index().context("modal closed unexpectedly")?;
        let outcome = modal.handle_key(key);
        let after = modal.current_index().context("modal closed unexpectedly")?;
        ensure!(after < len, "index {after} escaped sequence of {len}");
        match outcome {
            KeyOutcome::Navigated(Navigation::AtBoundary) => {
                ensure!(before == after, "boundary press moved the cursor");
            }
            KeyOutcome::Navigated(Navigation::Moved { index }) => {
                ensure!(index == after && index.abs_diff(before) == 1, "cursor jumped");
            }
            other => bail!("unexpected key outcome {other:?}"),
        }
        let buttons = modal.buttons();
        ensure!(buttons.prev_disabled == (after == 0), "prev button out of sync");
        ensure!(buttons.next_disabled == (after + 1 == len), "next button out of sync");
    }
    ensure!(
        modal.handle_key(ModalKey::Escape) == KeyOutcome::Closed,
        "escape did not close"
    );
    ensure!(!modal.scroll_locked(), "scroll still locked after close");
    Ok(())
}

fn gallery_flow(seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let source = funeral_catalog();
    let catalog = CatalogController::mount_with_ids(
        CatalogConfig::funeral_gallery("gallery", source.products()),
        gallery_actions(|_: &Product, _: &NodeId| {}),
        HeadlessSurface::with_container("gallery"),
        IdGenerator::seeded(seed),
    );
    let mut gallery = Gallery::new(catalog, ModalNavigator::new(), filter_buttons(source));

    let category = source
        .category_names
        .choose(&mut rng)
        .map(|c| c.id.clone())
        .context("funeral catalog has no categories")?;
    ensure!(gallery.show_category(&category), "no button for {category:?}");
    let visible: Vec<String> = gallery
        .catalog()
        .visible()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    let target = visible
        .choose(&mut rng)
        .cloned()
        .with_context(|| format!("category {category:?} is empty"))?;

    gallery
        .click(&target, CardControl::QuickView)
        .with_context(|| format!("card {target:?} not rendered"))?;
    let session = gallery.modal().session().context("quick view did not open")?;
    ensure!(
        session.len() == visible.len(),
        "lightbox spans {} products, filter shows {}",
        session.len(),
        visible.len()
    );
    ensure!(session.current().id == target, "lightbox opened on the wrong product");
    gallery.handle_key(ModalKey::ArrowRight);
    gallery.handle_key(ModalKey::ArrowLeft);
    ensure!(gallery.handle_key(ModalKey::Escape) == KeyOutcome::Closed, "escape ignored");
    gallery.teardown();
    ensure!(
        gallery.catalog().surface().cards().is_empty(),
        "teardown left cards behind"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_passes_on_a_few_seeds() {
        for scenario in SCENARIOS {
            for seed in [0, 1, 1337] {
                (scenario.run)(seed)
                    .unwrap_or_else(|err| panic!("{} seed {seed}: {err:#}", scenario.name));
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(get_scenario("Smoke").is_some());
        assert!(get_scenario("missing").is_none());
        assert_eq!(list_scenarios().count(), all_scenario_names().len());
    }
}
