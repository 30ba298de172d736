use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use strategist_templates::{
    DataKind, FsSource, MemorySource, TemplateCatalog, TemplateError, TemplateStore, ORG_TEMPLATE,
    TECH_TEMPLATE, TRAIT_TEMPLATE,
};
use tempfile::TempDir;

fn minimal_source() -> MemorySource {
    MemorySource::new()
        .with_template(
            ORG_TEMPLATE,
            r#"[
                // comments are fine in JSON5
                {dataName: "Org_Spies", command: 2, tradeable: true},
                {dataName: "Org_Bank", incomeMoney: 3, tier: 2,},
            ]"#,
        )
        .with_template(TRAIT_TEMPLATE, "[{dataName: 'Cunning', statMods: []}]")
        .with_localization(
            ORG_TEMPLATE,
            "TIOrgTemplate.displayName.Org_Spies=Spy Ring\n",
        )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_share_one_read() {
    let source = Arc::new(
        MemorySource::new()
            .with_template(TECH_TEMPLATE, "[{dataName: 'Fusion'}]")
            .with_delay(Duration::from_millis(50)),
    );
    let store = Arc::new(TemplateStore::new(source.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.template_set(TECH_TEMPLATE).await
        }));
    }
    let mut sets = Vec::new();
    for handle in handles {
        sets.push(handle.await.expect("join").expect("load"));
    }

    assert_eq!(source.reads_of(DataKind::Template, TECH_TEMPLATE), 1);
    assert!(sets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn waiters_see_the_loader_failure() {
    let source = Arc::new(
        MemorySource::new()
            .with_template("TIBroken", "[{oops")
            .with_delay(Duration::from_millis(50)),
    );
    let store = Arc::new(TemplateStore::new(source.clone()));

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.template_set("TIBroken").await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.template_set("TIBroken").await })
    };
    let a = a.await.expect("join").unwrap_err();
    let b = b.await.expect("join").unwrap_err();
    assert!(a.to_string().contains("TIBroken"));
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(source.reads_of(DataKind::Template, "TIBroken"), 1);
}

#[tokio::test]
async fn catalog_resolves_names_and_tolerates_optional_sets() {
    let store = TemplateStore::new(Arc::new(minimal_source()));
    let catalog = TemplateCatalog::load(&store).await.expect("catalog");

    assert!(catalog.org("Org_Spies").is_some_and(|o| o.tradable));
    assert!(catalog.trait_template("Cunning").is_some());
    assert!(catalog.techs().is_empty());
    assert!(catalog.hab_module("Anything").is_none());
    assert_eq!(catalog.display_name(ORG_TEMPLATE, "Org_Spies"), "Spy Ring");
    assert_eq!(catalog.display_name(ORG_TEMPLATE, "Org_Bank"), "Org_Bank");
}

#[tokio::test]
async fn catalog_requires_the_org_set() {
    let source = MemorySource::new().with_template(TRAIT_TEMPLATE, "[]");
    let store = TemplateStore::new(Arc::new(source));
    let err = TemplateCatalog::load(&store).await.unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
    assert!(err.to_string().contains(ORG_TEMPLATE));
}

#[tokio::test]
async fn record_without_data_name_is_invalid() {
    let source = minimal_source().with_template(TRAIT_TEMPLATE, "[{augmentation: true}]");
    let store = TemplateStore::new(Arc::new(source));
    let err = TemplateCatalog::load(&store).await.unwrap_err();
    assert!(
        matches!(err, TemplateError::InvalidRecord { ref name, .. } if name == TRAIT_TEMPLATE),
        "got {err:?}"
    );
}

#[tokio::test]
async fn catalog_loads_from_disk() {
    let temp = TempDir::new().expect("tempdir");
    let templates = temp.path().join("Templates");
    let localization = temp.path().join("Localization").join("en");
    std::fs::create_dir_all(&templates).expect("mkdir");
    std::fs::create_dir_all(&localization).expect("mkdir");
    std::fs::write(
        templates.join("TIOrgTemplate.json"),
        "[{dataName: 'Org_Spies', command: 2}]",
    )
    .expect("write");
    std::fs::write(templates.join("TITraitTemplate.json"), "[]").expect("write");
    std::fs::write(
        localization.join("TIOrgTemplate.en"),
        "TIOrgTemplate.displayName.Org_Spies = Spy Ring",
    )
    .expect("write");

    let store = TemplateStore::new(Arc::new(FsSource::new(temp.path(), "en")));
    let catalog = TemplateCatalog::load(&store).await.expect("catalog");
    assert_eq!(catalog.display_name(ORG_TEMPLATE, "Org_Spies"), "Spy Ring");
    assert_eq!(store.cached_templates(), 2);
}
