use clap::Parser;
use snappad::cli::args::{Args, Command, OrderArg};
use snappad::domain::note::{OrderField, Ordering};

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["snappad", "1234"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_with_search_and_order_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["snappad", "list", "rust", "--order", "updated", "--desc"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List {
            search,
            order,
            desc,
            json,
        } => {
            assert_eq!(search.as_deref(), Some("rust"));
            assert_eq!(order, Some(OrderArg::Updated));
            assert!(desc);
            assert!(!json);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn given_desc_without_order_when_parsing_then_fails() {
    let result = Args::try_parse_from(["snappad", "list", "--desc"]);
    assert!(result.is_err(), "--desc needs --order");
}

#[test]
fn given_order_arg_when_converting_then_maps_to_server_field() {
    assert_eq!(
        OrderArg::Created.ordering(true),
        Ordering {
            field: OrderField::CreatedAt,
            descending: true
        }
    );
    assert_eq!(OrderArg::Title.ordering(false).to_string(), "title");
}

#[test]
fn given_show_without_id_when_parsing_then_defaults_to_active_note() {
    let parsed = Args::try_parse_from(["snappad", "show", "--json"]).unwrap();

    match parsed.command {
        Command::Show { note_id, json } => {
            assert_eq!(note_id, None);
            assert!(json);
        }
        _ => panic!("Expected Show command"),
    }
}

#[test]
fn given_delete_command_when_parsing_then_confirmation_is_on_by_default() {
    // Arrange
    let args = vec!["snappad", "delete", "42"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Delete { note_id, yes } => {
            assert_eq!(note_id, 42);
            assert!(!yes);
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn given_color_command_when_parsing_then_reads_both_colors() {
    let parsed = Args::try_parse_from([
        "snappad",
        "color",
        "7",
        "--font",
        "#112233",
        "--background",
        "#FFEEDD",
    ])
    .unwrap();

    match parsed.command {
        Command::Color {
            note_id,
            font,
            background,
        } => {
            assert_eq!(note_id, 7);
            assert_eq!(font.as_deref(), Some("#112233"));
            assert_eq!(background.as_deref(), Some("#FFEEDD"));
        }
        _ => panic!("Expected Color command"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_succeeds() {
    // Arrange
    let args = vec![
        "snappad",
        "pin",
        "5",
        "--api-url",
        "https://notes.example.com/api/",
        "--session",
        "/tmp/session.json",
        "-vv",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert!(matches!(parsed.command, Command::Pin { note_id: 5 }));
    assert_eq!(
        parsed.api_url.as_deref(),
        Some("https://notes.example.com/api/")
    );
    assert_eq!(
        parsed.session,
        Some(std::path::PathBuf::from("/tmp/session.json"))
    );
    assert_eq!(parsed.verbose, 2);
}

#[test]
fn given_login_with_password_flag_when_parsing_then_succeeds() {
    let parsed = Args::try_parse_from([
        "snappad",
        "login",
        "--email",
        "ada@example.com",
        "--password",
        "hunter2",
    ])
    .unwrap();
    assert!(!parsed.command.needs_session());

    match parsed.command {
        Command::Login { email, password } => {
            assert_eq!(email, "ada@example.com");
            assert_eq!(password, "hunter2");
        }
        _ => panic!("Expected Login command"),
    }
}

#[test]
fn given_note_commands_when_checking_session_need_then_all_require_login() {
    for argv in [
        vec!["snappad", "new"],
        vec!["snappad", "list"],
        vec!["snappad", "rename", "1", "Title"],
        vec!["snappad", "edit"],
    ] {
        let parsed = Args::try_parse_from(argv.clone()).unwrap();
        assert!(parsed.command.needs_session(), "{argv:?}");
    }
}
