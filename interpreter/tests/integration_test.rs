use botka_script::{interpret_source, ExtraContext};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

fn read(path: &Path) -> String {
    let mut content = String::new();
    File::open(path)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

// `<script>.botka.ctx` holds one `key=value` pair per line
fn extra_context(path: &Path) -> ExtraContext {
    if !path.exists() {
        return ExtraContext::new();
    }

    read(path)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once('='))
        .collect()
}

fn sibling(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut filename = path.file_name().unwrap().to_os_string();
    filename.push(suffix);
    path.parent().unwrap().join(filename)
}

#[test]
fn test_scripts() {
    let source_files = WalkDir::new("tests/scripts")
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| matches!(entry.path().extension(), Some(extension) if extension == "botka"))
        .filter_map(|entry| {
            let exp_filepath = sibling(entry.path(), ".out");
            if exp_filepath.exists() {
                Some((entry, exp_filepath))
            } else {
                None
            }
        });

    let mut total = 0;

    for (src_path, exp_path) in source_files {
        println!("🕑 Running test: {}", src_path.path().display());

        let src_content = read(src_path.path());
        let exp_content = read(&exp_path);
        let extra = extra_context(&sibling(src_path.path(), ".ctx"));

        let result = interpret_source(&src_content, &extra);
        let actual = if result.success {
            assert!(result.stderr.is_empty());
            result.stdout
        } else {
            assert!(result.stdout.is_empty());
            result.stderr
        };

        assert_eq!(
            exp_content.trim_end_matches('\n'),
            actual,
            "unexpected output for {}",
            src_path.path().display()
        );

        println!("✅ Test complete: {}", src_path.path().display());
        total += 1;
    }

    assert!(total > 0, "no scripts found");
    println!("✅ Ran {} tests", total)
}

#[test]
fn test_parsing_is_repeatable() {
    let src = read(Path::new("tests/scripts/spoiler.botka"));
    let first: Vec<_> = botka_core::Scanner::new().scan_tokens(&src).collect();
    let second: Vec<_> = botka_core::Scanner::new().scan_tokens(&src).collect();

    assert_eq!(
        botka_script::Parser::new(&first).parse(),
        botka_script::Parser::new(&second).parse()
    );
}
