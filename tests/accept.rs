//! End-to-end runs: grammar in, verdicts out.

use pretty_assertions::assert_eq;

use lrtab::{
    augment, build_tables, first_sets, follow_sets, tokenize, Action, AutomatonBuilder, Grammar,
    Parser, ParsingTable, Seeding, SyntaxErrorKind, END,
};

fn logic_grammar() -> Grammar {
    Grammar::builder()
        .nonterminal("S")
        .nonterminal("P")
        .nonterminal("Q")
        .terminal("^")
        .terminal("V")
        .terminal("[")
        .terminal("]")
        .terminal("sentence")
        .production("S", "S ^ P")
        .production("S", "P")
        .production("P", "P V Q")
        .production("P", "Q")
        .production("Q", "[ S ]")
        .production("Q", "sentence")
        .build()
        .unwrap()
}

fn logic_table() -> ParsingTable {
    build_tables(&logic_grammar()).unwrap()
}

#[test]
fn accepts_well_formed_lines() {
    let table = logic_table();
    let parser = Parser::new(&table);

    for line in [
        "sentence",
        "sentence ^ sentence",
        "sentence V sentence",
        "[ sentence ]",
        "[ sentence ^ sentence ] V sentence",
        "[ [ sentence ] ] ^ sentence V sentence",
        "sentence $",
    ] {
        let result = parser.parse_line(&tokenize(line));
        assert!(result.accepted, "expected acceptance of {line:?}");
    }
}

#[test]
fn rejects_malformed_lines_with_diagnostics() {
    let table = logic_table();
    let parser = Parser::new(&table);

    let premature = parser.parse_line(&tokenize("sentence ^"));
    assert!(!premature.accepted);
    assert_eq!(
        premature.report.as_ref().unwrap().kind,
        SyntaxErrorKind::PrematureEnd
    );

    let missing = parser.parse_line(&tokenize("sentence sentence"));
    assert!(!missing.accepted);
    let report = missing.report.unwrap();
    assert_eq!(report.kind, SyntaxErrorKind::MissingSymbol);
    assert!(!report.expected.is_empty());
    assert!(!report.suggestions.is_empty());

    let unbalanced = parser.parse_line(&tokenize("[ sentence"));
    assert!(!unbalanced.accepted);
}

#[test]
fn batch_summary_counts_match_individual_verdicts() {
    let table = logic_table();
    let parser = Parser::new(&table);
    let lines: Vec<Vec<String>> = [
        "sentence",
        "sentence ^",
        "sentence V sentence",
        "V sentence",
        "[ sentence ] ^ [ sentence ]",
    ]
    .iter()
    .map(|line| tokenize(line))
    .collect();

    let summary = parser.parse_lines(&lines);
    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.results.len(), 5);
    for (line, result) in lines.iter().zip(&summary.results) {
        assert_eq!(result.accepted, parser.parse_line(line).accepted);
    }
}

#[test]
fn both_seedings_accept_the_same_language() {
    let grammar = logic_grammar();
    let augmented = augment(&grammar);
    let first = first_sets(&grammar);
    let follow = follow_sets(&grammar, &first);

    let mut tables = Vec::new();
    for seeding in [Seeding::AllProductions, Seeding::StartClosure] {
        let automaton = AutomatonBuilder::new(&augmented)
            .seeding(seeding)
            .build()
            .unwrap();
        tables.push(ParsingTable::build(&grammar, &automaton, &follow).unwrap());
    }

    for line in ["sentence", "[ sentence V sentence ]", "sentence ^", "] ["] {
        let tokens = tokenize(line);
        let verdicts: Vec<bool> = tables
            .iter()
            .map(|table| Parser::new(table).parse_line(&tokens).accepted)
            .collect();
        assert_eq!(verdicts[0], verdicts[1], "verdicts diverge on {line:?}");
    }
}

#[test]
fn serialized_table_parses_identically() {
    let table = logic_table();
    let json = serde_json::to_string(&table).unwrap();
    let reloaded: ParsingTable = serde_json::from_str(&json).unwrap();
    assert_eq!(table, reloaded);

    let parser = Parser::new(&reloaded);
    assert!(parser.parse_line(&tokenize("[ sentence ] V sentence")).accepted);
    assert!(!parser.parse_line(&tokenize("^ sentence")).accepted);
}

#[test]
fn table_rendering_lists_states_and_rules() {
    let table = logic_table();
    let rendered = table.to_string();
    assert!(rendered.contains(END));
    assert!(rendered.contains("R1"));
    assert!(rendered.contains("acc"));
    assert!(rendered.contains("-> sentence"));
}

#[test]
fn single_accept_cell_per_table() {
    let table = logic_table();
    let accepts = (0..table.len())
        .filter(|&state| table.action(state, END) == Some(&Action::Accept))
        .count();
    assert_eq!(accepts, 1);
}
