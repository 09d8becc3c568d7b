use super::*;

fn parse(line: &str) -> ExploreCommand {
    ExploreCommand::parse(line)
        .unwrap_or_else(|e| panic!("'{line}' should parse: {e}"))
        .unwrap_or_else(|| panic!("'{line}' should produce a command"))
}

#[test]
fn blank_lines_are_ignored() {
    assert!(ExploreCommand::parse("").unwrap().is_none());
    assert!(ExploreCommand::parse("   \t ").unwrap().is_none());
}

#[test]
fn view_takes_lat_lng_and_zoom() {
    assert_eq!(
        parse("view 41.38 2.12 9"),
        ExploreCommand::View {
            center: Coordinates::new(41.38, 2.12),
            zoom: 9,
        }
    );
    assert_eq!(
        parse("goto -22.91 -43.23 7"),
        ExploreCommand::View {
            center: Coordinates::new(-22.91, -43.23),
            zoom: 7,
        }
    );
}

#[test]
fn view_rejects_bad_arguments() {
    assert!(ExploreCommand::parse("view 41.38 2.12").is_err());
    assert!(ExploreCommand::parse("view north 2.12 9").is_err());
    assert!(ExploreCommand::parse("view 95 2.12 9").is_err());
    assert!(ExploreCommand::parse("view 41.38 2.12 30").is_err());
    assert!(ExploreCommand::parse("view 41.38 2.12 -1").is_err());
}

#[test]
fn view_accepts_unwrapped_longitude() {
    assert_eq!(
        parse("view 10 190 8"),
        ExploreCommand::View {
            center: Coordinates::new(10.0, 190.0),
            zoom: 8,
        }
    );
}

#[test]
fn search_joins_words_and_may_be_empty() {
    assert_eq!(
        parse("search  santiago   bernabeu "),
        ExploreCommand::Search("santiago bernabeu".to_owned())
    );
    assert_eq!(parse("search"), ExploreCommand::Search(String::new()));
}

#[test]
fn select_and_visit_need_exactly_one_id() {
    assert_eq!(
        parse("select camp-nou"),
        ExploreCommand::Select("camp-nou".to_owned())
    );
    assert_eq!(parse("show wembley"), ExploreCommand::Select("wembley".to_owned()));
    assert_eq!(parse("visit anfield"), ExploreCommand::Visit("anfield".to_owned()));
    assert!(ExploreCommand::parse("select").is_err());
    assert!(ExploreCommand::parse("visit a b").is_err());
}

#[test]
fn keywords_are_case_insensitive_with_aliases() {
    assert_eq!(parse("LIST"), ExploreCommand::List);
    assert_eq!(parse("ls"), ExploreCommand::List);
    assert_eq!(parse("Status"), ExploreCommand::Status);
    assert_eq!(parse("?"), ExploreCommand::Help);
    assert_eq!(parse("exit"), ExploreCommand::Quit);
    assert_eq!(parse("q"), ExploreCommand::Quit);
}

#[test]
fn unknown_command_is_an_error() {
    let err = ExploreCommand::parse("fly 1 2 3").unwrap_err();
    assert!(err.to_string().contains("unknown command 'fly'"));
}
