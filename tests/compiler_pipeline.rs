use singularis_prime::core::compiler::{Compiler, BYTECODE_HEADER};
use singularis_prime::core::error::SingularisError;

const GUARDED_DEPLOYMENT: &str = r#"import "quantum/core";
@secure
quantumKey k = entangle(alice, bob);
contract Guard {
    enforce explainabilityThreshold(0.9);
    log("checked");
}
deployModel Oracle to edge-cluster {
    replicas: 3;
    monitor;
}
function greet(name) {
    return   name;
}
"#;

#[test]
fn pipeline_bytecode_snapshot() {
    let out = Compiler::new().compile_source(GUARDED_DEPLOYMENT).expect("compile should succeed");
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
    insta::assert_snapshot!(out.bytecode.join("\n"), @r###"
    IMPORT "quantum/core"
    ANNOTATE @secure
    QKEY_INIT k
    QKEY_ENTANGLE k alice bob
    CONTRACT_BEGIN Guard
      ENFORCE explainabilityThreshold 0.9
      INVOKE log("checked")
    CONTRACT_END Guard
    DEPLOY Oracle -> edge-cluster
      PROP replicas = 3
      PROP monitor
    DEPLOY_END Oracle
    FUNC_BEGIN greet(name)
      STMT return name
    FUNC_END greet
    HALT
    "###);
}

#[test]
fn pipeline_stats_match_declarations() {
    let out = Compiler::new().compile_source(GUARDED_DEPLOYMENT).unwrap();
    assert_eq!(out.stats.declarations, 6);
    assert_eq!(out.stats.contracts, 1);
    assert_eq!(out.stats.enforce_statements, 1);
    assert_eq!(out.stats.quantum_keys, 1);
    assert_eq!(out.stats.deployments, 1);
    assert_eq!(out.stats.functions, 1);
}

#[test]
fn header_is_first_line() {
    let out = Compiler::new().with_header(true).compile_source("import \"a\";").unwrap();
    assert_eq!(out.bytecode.first().map(String::as_str), Some(BYTECODE_HEADER));
    assert_eq!(out.bytecode.last().map(String::as_str), Some("HALT"));
    assert!(out.render().ends_with("HALT\n"));
}

#[test]
fn warnings_cover_weak_declarations() {
    let src = r#"
        quantumKey solo = entangle(alice);
        contract Loose { log("nothing enforced"); }
        contract Strict { enforce explainabilityThreshold(1.4); }
        @orphan
    "#;
    let out = Compiler::new().compile_source(src).unwrap();
    let joined = out.warnings.join("\n");
    assert!(joined.contains("quantum key 'solo'"), "{}", joined);
    assert!(joined.contains("needs at least two participants (found 1)"), "{}", joined);
    assert!(joined.contains("contract 'Loose'") && joined.contains("enforces nothing"), "{}", joined);
    assert!(joined.contains("contract 'Strict': explainabilityThreshold value 1.4 is outside [0, 1]"), "{}", joined);
    assert!(joined.contains("annotation @orphan"), "{}", joined);
}

#[test]
fn parser_warnings_come_first() {
    let out = Compiler::new().compile_source("let x = 1;\ncontract C { enforce humanOversight(); }").unwrap();
    assert!(out.warnings[0].starts_with("skipped"));
    assert_eq!(out.stats.contracts, 1);
}

#[test]
fn empty_source_is_rejected() {
    let err = Compiler::new().compile_source("\n   \n").unwrap_err();
    assert_eq!(err, SingularisError::Compile("Code is empty. Nothing to compile.".into()));
}
