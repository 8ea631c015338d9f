use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

use mechsync_recon::model::MissingEntry;
use mechsync_recon::{reconcile, reconcile_at, ReconError, ReconOptions};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: tempdir().unwrap() }
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("manifest.json")
    }

    fn backup_path(&self) -> PathBuf {
        self.dir.path().join("manifest.backup.json")
    }

    fn write(&self, rel: &str, body: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, body).unwrap();
    }

    fn write_manifest(&self, manifest: &Value) {
        self.write("manifest.json", &serde_json::to_string_pretty(manifest).unwrap());
    }

    fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn items(&self) -> Vec<Value> {
        self.read_json(&self.manifest_path())["items"].as_array().unwrap().clone()
    }

    fn run(&self) -> mechsync_recon::ReconSummary {
        reconcile(&self.manifest_path(), &ReconOptions::default()).unwrap()
    }
}

fn is_generated_stamp(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 20
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            10 => *c == b'T',
            13 | 16 => *c == b':',
            19 => *c == b'Z',
            _ => c.is_ascii_digit(),
        })
}

// -------------------------------------------------------------------------
// Worked scenarios
// -------------------------------------------------------------------------

#[test]
fn path_item_is_merged() {
    let fx = Fixture::new();
    fx.write("a/mech.json", r#"{"movement":{"walk":5,"jump":"3"},"source":"core","role":"tank"}"#);
    fx.write_manifest(&json!({"items": [{"path": "a/mech.json", "displayName": "Atlas"}]}));

    let summary = fx.run();

    assert_eq!(summary.updated, 1);
    assert!(summary.is_clean());
    assert_eq!(
        fx.items()[0],
        json!({
            "path": "a/mech.json",
            "displayName": "Atlas",
            "movement": {"walk": 5, "jump": 3},
            "source": "core",
            "role": "tank"
        })
    );
}

#[test]
fn bucket_file_not_found() {
    let fx = Fixture::new();
    let item = json!({"bucket": "b", "file": "x.json", "role": "keep"});
    fx.write_manifest(&json!({"items": [item.clone()]}));

    let summary = fx.run();

    assert_eq!(summary.updated, 0);
    assert_eq!(
        summary.missing,
        vec![MissingEntry::FileNotFound { index: 0, path: "b/x.json".into() }]
    );
    assert_eq!(fx.items()[0], item);
}

#[test]
fn item_without_path() {
    let fx = Fixture::new();
    fx.write_manifest(&json!({"items": [{"model": "HBK-4G"}]}));

    let summary = fx.run();

    assert_eq!(
        summary.missing,
        vec![MissingEntry::NoPath { index: 0, item: Some("HBK-4G".into()) }]
    );
}

#[test]
fn invalid_item_json_is_isolated() {
    let fx = Fixture::new();
    fx.write("bad.json", "{\"movement\": ");
    fx.write("good.json", r#"{"role": "sniper"}"#);
    let bad = json!({"path": "bad.json", "source": "prior"});
    fx.write_manifest(&json!({"items": [bad.clone(), {"path": "good.json"}]}));

    let summary = fx.run();

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].path, "bad.json");
    assert!(!summary.errors[0].error.is_empty());
    let items = fx.items();
    assert_eq!(items[0], bad);
    assert_eq!(items[1]["role"], "sniper");
}

#[test]
fn partial_source_resets_fields() {
    let fx = Fixture::new();
    fx.write("scout.json", r#"{"role":"scout"}"#);
    fx.write_manifest(&json!({"items": [{
        "path": "scout.json",
        "movement": {"walk": 8, "jump": 8},
        "source": "old",
        "role": "old"
    }]}));

    fx.run();

    let item = &fx.items()[0];
    assert_eq!(item["movement"], json!({"walk": 0, "jump": 0}));
    assert_eq!(item["source"], "");
    assert_eq!(item["role"], "scout");
}

#[test]
fn missing_manifest_writes_nothing() {
    let fx = Fixture::new();
    fx.write("manifest.backup.json", "untouched");

    let err = reconcile(&fx.manifest_path(), &ReconOptions::default()).unwrap_err();

    assert!(matches!(err, ReconError::ManifestLoad { .. }));
    assert!(!fx.manifest_path().exists());
    assert_eq!(std::fs::read_to_string(fx.backup_path()).unwrap(), "untouched");
}

#[test]
fn unparseable_manifest_writes_nothing() {
    let fx = Fixture::new();
    fx.write("manifest.json", "{\"items\": [");

    let err = reconcile(&fx.manifest_path(), &ReconOptions::default()).unwrap_err();

    assert!(err.is_load_failure());
    assert!(!fx.backup_path().exists());
    assert_eq!(std::fs::read_to_string(fx.manifest_path()).unwrap(), "{\"items\": [");
}

// -------------------------------------------------------------------------
// Persisted output
// -------------------------------------------------------------------------

#[test]
fn backup_matches_primary() {
    let fx = Fixture::new();
    fx.write("m.json", r#"{"movement":{"walk":3,"jump":3},"source":"3025","role":"skirmisher"}"#);
    fx.write_manifest(&json!({"version": 4, "items": [{"path": "m.json"}, {}]}));

    fx.run();

    let backup = std::fs::read(fx.backup_path()).unwrap();
    let primary = std::fs::read(fx.manifest_path()).unwrap();
    assert_eq!(backup, primary);
    assert!(std::str::from_utf8(&primary).unwrap().starts_with("{\n  \"version\": 4,"));
}

#[test]
fn generated_stamp() {
    let fx = Fixture::new();
    fx.write_manifest(&json!({"generated": "2000-01-01T00:00:00Z", "items": []}));

    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
    let summary = reconcile_at(&fx.manifest_path(), &ReconOptions::default(), now).unwrap();

    assert_eq!(summary.generated, "2024-05-01T12:34:56Z");
    let written = fx.read_json(&fx.manifest_path());
    assert_eq!(written["generated"], "2024-05-01T12:34:56Z");
}

#[test]
fn generated_stamp_with_wall_clock() {
    let fx = Fixture::new();
    fx.write_manifest(&json!({"items": []}));
    let summary = fx.run();
    assert!(is_generated_stamp(&summary.generated), "{}", summary.generated);
}

#[test]
fn passthrough_fields_survive_in_order() {
    let fx = Fixture::new();
    fx.write("m.json", "{}");
    fx.write(
        "manifest.json",
        r#"{"zeta": 1, "items": [{"path": "m.json", "tags": ["x"], "bv": 1897}], "alpha": {"nested": true}}"#,
    );

    fx.run();

    let text = std::fs::read_to_string(fx.manifest_path()).unwrap();
    let zeta = text.find("\"zeta\"").unwrap();
    let items = text.find("\"items\"").unwrap();
    let alpha = text.find("\"alpha\"").unwrap();
    let generated = text.find("\"generated\"").unwrap();
    assert!(zeta < items && items < alpha && alpha < generated);
    let item = &fx.items()[0];
    assert_eq!(item["tags"], json!(["x"]));
    assert_eq!(item["bv"], 1897);
}

#[test]
fn large_numbers_survive_verbatim() {
    let fx = Fixture::new();
    fx.write(
        "manifest.json",
        r#"{"serial": 123456789012345678901234, "price": 1.0, "items": []}"#,
    );

    fx.run();

    let text = std::fs::read_to_string(fx.manifest_path()).unwrap();
    assert!(text.contains("\"serial\": 123456789012345678901234"), "{text}");
    assert!(text.contains("\"price\": 1.0"), "{text}");
}

#[test]
fn dry_run_writes_nothing() {
    let fx = Fixture::new();
    fx.write("m.json", r#"{"role": "x"}"#);
    let manifest = json!({"items": [{"path": "m.json"}]});
    fx.write_manifest(&manifest);
    let before = std::fs::read(fx.manifest_path()).unwrap();

    let summary = reconcile(&fx.manifest_path(), &ReconOptions::default().dry_run(true)).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.updated, 1);
    assert_eq!(std::fs::read(fx.manifest_path()).unwrap(), before);
    assert!(!fx.backup_path().exists());
}

#[test]
fn summary_samples_first_three() {
    let fx = Fixture::new();
    let items: Vec<Value> = (0..5).map(|i| json!({"path": format!("gone/{i}.json")})).collect();
    fx.write_manifest(&json!({"items": items}));

    let summary = fx.run();

    assert_eq!(summary.items, 5);
    assert_eq!(summary.missing.len(), 5);
    let sample: Vec<usize> = summary.missing_sample().iter().map(MissingEntry::index).collect();
    assert_eq!(sample, [0, 1, 2]);
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum ItemCase {
    Good { walk: i64, role: String },
    Broken,
    Absent,
    NoPath,
}

fn item_case() -> impl Strategy<Value = ItemCase> {
    prop_oneof![
        (-20i64..20, "[a-z]{0,6}").prop_map(|(walk, role)| ItemCase::Good { walk, role }),
        Just(ItemCase::Broken),
        Just(ItemCase::Absent),
        Just(ItemCase::NoPath),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn order_kept_and_skipped_items_untouched(cases in prop::collection::vec(item_case(), 0..12)) {
        let fx = Fixture::new();
        let mut items = Vec::new();
        for (i, case) in cases.iter().enumerate() {
            let rel = format!("mechs/{i}.json");
            match case {
                ItemCase::Good { walk, role } => {
                    fx.write(&rel, &json!({"movement": {"walk": walk}, "role": role}).to_string());
                    items.push(json!({"path": rel, "n": i}));
                }
                ItemCase::Broken => {
                    fx.write(&rel, "{");
                    items.push(json!({"path": rel, "n": i, "role": "prior"}));
                }
                ItemCase::Absent => items.push(json!({"bucket": "mechs", "file": format!("{i}.json"), "n": i})),
                ItemCase::NoPath => items.push(json!({"n": i, "displayName": "x"})),
            }
        }
        fx.write_manifest(&json!({"items": items.clone()}));

        let summary = fx.run();
        let out = fx.items();

        prop_assert_eq!(out.len(), items.len());
        for (i, (case, (before, after))) in cases.iter().zip(items.iter().zip(out.iter())).enumerate() {
            prop_assert_eq!(&after["n"], &json!(i));
            match case {
                ItemCase::Good { walk, role } => {
                    prop_assert_eq!(&after["movement"], &json!({"walk": walk, "jump": 0}));
                    prop_assert_eq!(&after["role"], &json!(role));
                    prop_assert_eq!(&after["source"], &json!(""));
                }
                _ => {
                    prop_assert_eq!(after, before);
                }
            }
        }
        let good = cases.iter().filter(|c| matches!(c, ItemCase::Good { .. })).count();
        prop_assert_eq!(summary.updated, good);
        prop_assert_eq!(summary.updated + summary.missing.len() + summary.errors.len(), cases.len());
    }
}
