//! End-to-end specialization tests.

use platformed_core::{
    BuildMode, PlatformRegistry, SpecializeError, Specializer, SpecializerConfig, Transform,
};

const PLATFORMS: [&str; 3] = ["ios", "android", "web"];

fn specializer(target: &str) -> Specializer {
    let registry = PlatformRegistry::new(target, PLATFORMS).expect("valid registry");
    Specializer::new(SpecializerConfig::new(registry))
}

fn rewrite(target: &str, code: &str) -> String {
    match specializer(target)
        .transform(code, "src/App/App.platformed.tsx")
        .expect("transform")
    {
        Transform::Rewritten(rewrite) => rewrite.code,
        Transform::Unchanged => panic!("marked module left unchanged"),
    }
}

#[test]
fn target_import_survives() {
    let code = "import Foo from './x.ios.js';\nimport Foo from './x.common.js';\n";
    assert_eq!(rewrite("ios", code), "import Foo from './x.ios.js';\n");
}

#[test]
fn common_import_is_the_fallback() {
    let code = "import Foo from './x.common.js';\nimport Bar from './x.android.js';\n";
    assert_eq!(rewrite("ios", code), "import Foo from './x.common.js';\n");
}

#[test]
fn common_value_is_the_fallback() {
    let code = "\
import { platformed } from 'virtual:platformed';
const label = platformed({ ios: 'A', common: 'B' });
";
    assert_eq!(rewrite("android", code), "const label = 'B';\n");
}

#[test]
fn calls_resolve_without_a_marker_import() {
    let code = "const v = platformed({ ios: 'A', common: 'B' })";
    assert_eq!(rewrite("android", code), "const v = 'B'");
    assert_eq!(rewrite("ios", code), "const v = 'A'");
}

#[test]
fn unimported_spread_is_fatal_for_every_target() {
    for target in ["ios", "android", "web", "common"] {
        let err = specializer(target)
            .transform("platformed({ ...common, ios: 2 });", "file.platformed.js")
            .expect_err("spread element");
        assert!(err.to_string().contains("spread element"), "{target}: {err}");
    }
}

#[test]
fn unimported_call_without_override_is_fatal() {
    let err = specializer("ios")
        .transform("platformed({ android: 2 });", "file.platformed.js")
        .expect_err("no ios or common value");
    assert!(matches!(err, SpecializeError::Coverage { .. }));
    assert!(err.to_string().contains("Unable to find override"), "{err}");
}

#[test]
fn missing_override_names_platform_and_module() {
    let code = "\
import { platformed } from 'virtual:platformed';
const label = platformed({ android: 'A' });
";
    let err = specializer("ios")
        .transform(code, "src/App/App.platformed.tsx")
        .expect_err("no ios or common value");
    let msg = err.to_string();
    assert!(matches!(err, SpecializeError::Coverage { .. }));
    assert!(msg.contains("\"ios\""), "{msg}");
    assert!(msg.contains("src/App/App.platformed.tsx"), "{msg}");
    assert!(msg.contains("android: 'A'"), "{msg}");
}

#[test]
fn spread_is_fatal_for_every_target() {
    let code = "\
import { platformed } from 'virtual:platformed';
const styles = platformed({ ...base, ios: {}, common: {} });
";
    for target in ["ios", "android", "web", "common"] {
        let err = specializer(target)
            .transform(code, "styles.platformed.ts")
            .expect_err("spread element");
        assert!(
            err.to_string().contains("spread element"),
            "{target}: {err}"
        );
    }
}

#[test]
fn marker_in_plain_module_is_fatal_for_every_target() {
    let code = "import { platformed } from 'virtual:platformed';\nexport default 1;\n";
    for target in ["ios", "android", "common"] {
        let err = specializer(target)
            .transform(code, "src/Root/Root.tsx")
            .expect_err("misuse");
        assert_eq!(
            err.to_string(),
            "Module \"src/Root/Root.tsx\" contains import from \"virtual:platformed\", but wasn't marked as \".platformed\""
        );
    }
}

#[test]
fn marker_in_untokenizable_plain_module_is_fatal() {
    let code = "import { platformed } from 'virtual:platformed';\nif (ok) /'/.test(s);\n";
    let err = specializer("ios")
        .transform(code, "src/Root.tsx")
        .expect_err("misuse");
    assert!(matches!(err, SpecializeError::Misuse { .. }));
}

#[test]
fn imports_sharing_a_line_leave_no_blank_line() {
    let code = "import { platformed } from 'virtual:platformed'; import A from './a.android';\nconst x = 1;\n";
    assert_eq!(rewrite("ios", code), "const x = 1;\n");
}

#[test]
fn target_wins_regardless_of_key_order_and_count() {
    let orders = [
        "{ ios: 'I', android: 'A', common: 'C' }",
        "{ common: 'C', ios: 'I' }",
        "{ android: 'A', web: 'W', ios: 'I', common: 'C' }",
        "{ ios: 'I' }",
    ];
    for object in orders {
        let code = format!(
            "import {{ platformed }} from 'virtual:platformed';\nconst v = platformed({object});\n"
        );
        assert_eq!(rewrite("ios", &code), "const v = 'I';\n", "{object}");
    }
}

#[test]
fn output_is_a_fixed_point() {
    let code = "\
import { platformed as pick } from 'virtual:platformed';
import './Header.ios.scss';
import './Header.common.scss';
import Icon from './Icon.common';

export function Header(props) {
  return (
    <View style={pick({ ios: { paddingTop: 20 }, common: {} })}>
      {`${props.title}${pick({ web: '!', common: '' })}`}
      <Icon />
    </View>
  );
}
";
    for target in ["ios", "android", "web"] {
        let once = rewrite(target, code);
        let twice = rewrite(target, &once);
        assert_eq!(once, twice, "{target}");
        assert!(!once.contains("virtual:platformed"));
        assert!(!once.contains("pick("));
    }
}

#[test]
fn style_pruning_ignores_code_imports() {
    let with_code = "\
import './a.ios.css';
import './a.common.css';
import A from './A.android';
import A2 from './A.common';
";
    let without_code = "import './a.ios.css';\nimport './a.common.css';\n";

    let styles = |out: String| -> Vec<String> {
        out.lines()
            .filter(|line| line.contains(".css"))
            .map(str::to_string)
            .collect()
    };
    for target in ["ios", "android"] {
        assert_eq!(
            styles(rewrite(target, with_code)),
            styles(rewrite(target, without_code)),
            "{target}"
        );
    }
}

#[test]
fn development_mode_keeps_unknown_imports() {
    let registry = PlatformRegistry::new("ios", PLATFORMS).expect("valid registry");
    let config = SpecializerConfig::new(registry).with_mode(BuildMode::Development);
    let code = "import logo from './logo.ios.svg';\n";

    let out = Specializer::new(config)
        .transform(code, "Logo.platformed.ts")
        .expect("development transform");
    let Transform::Rewritten(rewrite) = out else {
        panic!("marked module left unchanged");
    };
    assert_eq!(rewrite.code, code);
    assert_eq!(rewrite.diagnostics.len(), 1);
    assert!(rewrite.diagnostics[0].message.contains("\"svg\""));

    let err = specializer("ios")
        .transform(code, "Logo.platformed.ts")
        .expect_err("production build");
    assert!(matches!(err, SpecializeError::Classification { .. }));
}

#[test]
fn concurrent_transforms_share_one_specializer() {
    let specializer = specializer("android");
    let modules: Vec<(String, String)> = (0..16)
        .map(|i| {
            let code = format!(
                "import {{ platformed }} from 'virtual:platformed';\nexport const v{i} = platformed({{ android: {i}, common: -1 }});\n"
            );
            (format!("m{i}.platformed.js"), code)
        })
        .collect();

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = modules
            .iter()
            .map(|(id, code)| {
                let specializer = &specializer;
                scope.spawn(move || {
                    specializer
                        .transform(code, id)
                        .expect("transform")
                        .code_or(code)
                        .to_string()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    for (i, out) in outputs.iter().enumerate() {
        assert_eq!(out, &format!("export const v{i} = {i};\n"));
    }
}
