use catchfix::{CatchRewriter, CatchShape, RewriteConfig};
use std::fs;
use std::io::Write;
use std::path::Path;

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut temp = tempfile::Builder::new()
        .suffix(".cs")
        .tempfile()
        .expect("tempfile");
    temp.write_all(contents.as_bytes()).expect("write temp");
    temp.flush().expect("flush temp");
    temp
}

#[test]
fn connection_handler_fixture() {
    let input = load_fixture("ConnectionHandler.cs.input");
    let expected = load_fixture("ConnectionHandler.cs.expected");
    let temp = write_temp(&input);

    let rewriter = CatchRewriter::new(&RewriteConfig::default()).expect("rewriter");
    let fix = rewriter.fix_file(temp.path(), false).expect("fix file");

    assert_eq!(fix.count(), 3);
    assert!(fix.written);

    let methods: Vec<(usize, CatchShape, &str)> = fix
        .fixes
        .iter()
        .map(|f| (f.line, f.shape, f.method.as_str()))
        .collect();
    assert_eq!(
        methods,
        vec![
            (16, CatchShape::MultiLine, "Disconnect"),
            (20, CatchShape::SingleLine, "Disconnect"),
            (37, CatchShape::SingleLine, "Send"),
        ]
    );

    let output = fs::read_to_string(temp.path()).expect("read output");
    assert_eq!(output, expected);

    // Second application is a no-op
    let again = rewriter.fix_file(temp.path(), false).expect("fix file");
    assert_eq!(again.count(), 0);
    assert!(!again.written);
    assert_eq!(fs::read_to_string(temp.path()).expect("read"), expected);
}

#[test]
fn expected_fixture_is_stable_in_memory() {
    let expected = load_fixture("ConnectionHandler.cs.expected");
    let rewriter = CatchRewriter::new(&RewriteConfig::default()).expect("rewriter");

    let result = rewriter
        .rewrite_source(Path::new("ConnectionHandler.cs"), &expected)
        .expect("rewrite");

    assert_eq!(result.count(), 0);
    assert_eq!(result.content, expected);
}

#[test]
fn custom_handler_from_config() {
    let config = catchfix::load_from_str(
        r#"
[handler]
exception_type = "Exception"
binding = "error"
call = "Logger.Swallow"
message_suffix = "threw"

[locator]
fallback_name = "anonymous"
"#,
    )
    .expect("config");

    let rewriter = CatchRewriter::new(&config).expect("rewriter");
    let result = rewriter
        .rewrite_source(
            Path::new("Inline.cs"),
            "var f = () => { try { Go(); } catch { } };\npublic int Parse(string s) { try { } catch { } return 0; }\n",
        )
        .expect("rewrite");

    assert_eq!(result.count(), 2);
    assert!(result
        .content
        .contains("Logger.Swallow(() => { }, error, \"anonymous threw\");"));
    assert!(result
        .content
        .contains("Logger.Swallow(() => { }, error, \"Parse threw\");"));
    assert!(result.content.contains("catch (Exception error)"));
}
