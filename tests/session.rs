//! Tests for the form session state machine.
mod common;
use common::*;
use yoshiki::prelude::*;
use yoshiki::session::explain_visibility;

fn jane() -> FormSession {
    let forms = parse_forms(
        r#"[{ "formId": "p", "title": "Person", "fields": [
            { "id": "name", "type": "text", "label": "Name" },
            { "id": "age", "type": "text", "label": "Age" }
        ] }]"#,
    )
    .unwrap();
    let mut session = FormSession::new(forms);
    session.set_answer("name", "Jane").unwrap();
    session.set_answer("age", "30").unwrap();
    session
}

#[test]
fn test_new_session_is_idle_and_empty() {
    let session = FormSession::new(forms(SCENARIO_A));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.answers().is_empty());
    assert!(session.cache().is_empty());
}

#[test]
fn test_country_state_dynamic_options() {
    let mut session = FormSession::new(forms(SCENARIO_A));

    let requests = session.set_answer("country", "US").unwrap();
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, "/states");
    assert_eq!(requests[0].depends_on, "country");
    assert_eq!(requests[0].value, "US");

    // Before the fetch resolves only the sentinel is offered.
    assert_eq!(session.options_for("state").unwrap(), vec![SelectOption::sentinel()]);

    assert!(session.apply_options(&requests[0], vec!["CA".to_string(), "NY".to_string()]));
    let options = session.options_for("state").unwrap();
    assert!(options[0].is_sentinel());
    assert_eq!(option_values(&options), vec!["CA", "NY"]);

    // Editing the dependent field itself triggers nothing.
    assert!(session.set_answer("state", "CA").unwrap().is_empty());
}

#[test]
fn test_stale_fetch_results_are_discarded() {
    let mut session = FormSession::new(forms(SCENARIO_A));

    let first = session.set_answer("country", "US").unwrap().remove(0);
    let second = session.set_answer("country", "IN").unwrap().remove(0);
    assert_eq!(second.value, "IN");

    // The US lookup completes after the user already switched to IN.
    assert!(!session.apply_options(&first, vec!["CA".to_string()]));
    assert_eq!(session.options_for("state").unwrap(), vec![SelectOption::sentinel()]);

    assert!(session.apply_options(&second, vec!["KA".to_string()]));
    assert_eq!(option_values(&session.options_for("state").unwrap()), vec!["KA"]);
}

#[test]
fn test_clearing_controlling_value_invalidates_options() {
    let mut session = FormSession::new(forms(SCENARIO_A));
    let request = session.set_answer("country", "US").unwrap().remove(0);
    session.apply_options(&request, vec!["CA".to_string()]);
    assert_eq!(session.cache().len(), 1);

    let requests = session.set_answer("country", "").unwrap();
    assert!(requests.is_empty());
    assert!(session.cache().get("state").is_none());
    assert_eq!(session.options_for("state").unwrap(), vec![SelectOption::sentinel()]);

    // Picking the same country again fetches anew.
    let requests = session.set_answer("country", "US").unwrap();
    assert_eq!(requests.len(), 1);
}

#[test]
fn test_failed_fetch_leaves_sentinel_only() {
    let mut session = FormSession::new(forms(SCENARIO_A));
    let request = session.set_answer("country", "US").unwrap().remove(0);

    session.fetch_failed(
        &request,
        &SourceError::Status {
            url: "/states".to_string(),
            status: 500,
        },
    );
    assert!(session.cache().is_empty());
    assert_eq!(session.options_for("state").unwrap(), vec![SelectOption::sentinel()]);
    assert_eq!(session.options_for("country").unwrap().len(), 3);
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut session = FormSession::new(forms(SCENARIO_A));
    assert_eq!(
        session.set_answer("zip", "12345"),
        Err(SessionError::UnknownField("zip".to_string()))
    );
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_successful_submit_resets_answers() {
    let mut session = jane();

    let payload = session.begin_submit().unwrap();
    assert_eq!(payload, answers(&[("name", "Jane"), ("age", "30")]));
    assert_eq!(session.state(), SessionState::Submitting);

    assert_eq!(session.complete_submit(Ok(())), Ok(SessionState::SubmitSucceeded));
    assert!(session.answers().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_failed_submit_preserves_answers() {
    let mut session = jane();
    session.begin_submit().unwrap();

    let outcome = session.complete_submit(Err(SourceError::Status {
        url: "/submit".to_string(),
        status: 503,
    }));
    assert_eq!(outcome, Ok(SessionState::SubmitFailed));
    assert_eq!(session.answers(), &answers(&[("name", "Jane"), ("age", "30")]));
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn test_only_one_submit_in_flight() {
    let mut session = jane();
    session.begin_submit().unwrap();

    assert_eq!(session.begin_submit(), Err(SessionError::SubmitInProgress));
    assert_eq!(session.reset(), Err(SessionError::SubmitInProgress));

    // Edits during a submission are kept but the state stays put.
    session.set_answer("age", "31").unwrap();
    assert_eq!(session.state(), SessionState::Submitting);
    assert_eq!(session.answers().get("age"), Some("31"));
}

#[test]
fn test_complete_without_begin_is_rejected() {
    let mut session = jane();
    assert_eq!(session.complete_submit(Ok(())), Err(SessionError::NotSubmitting));
    assert_eq!(session.answers().len(), 2);
}

#[test]
fn test_reset_clears_answers_and_options() {
    let mut session = FormSession::new(forms(SCENARIO_A));
    let request = session.set_answer("country", "US").unwrap().remove(0);
    session.apply_options(&request, vec!["CA".to_string()]);

    session.reset().unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.answers().is_empty());
    assert!(session.cache().is_empty());

    // The tracker forgot the old value too.
    assert_eq!(session.set_answer("country", "US").unwrap().len(), 1);
}

#[test]
fn test_hidden_answers_are_submitted_by_default() {
    let mut session = FormSession::new(forms(SCENARIO_B));
    session.set_answer("age", "70").unwrap();
    session.set_answer("seniorDiscount", "Yes").unwrap();
    session.set_answer("age", "40").unwrap();

    assert!(!session.visible_field_ids().contains("seniorDiscount"));
    let payload = session.begin_submit().unwrap();
    assert_eq!(payload.get("seniorDiscount"), Some("Yes"));
}

#[test]
fn test_pruned_submission_drops_hidden_answers() {
    let mut session = FormSession::new(forms(SCENARIO_B)).with_pruned_submissions(true);
    session.set_answer("age", "70").unwrap();
    session.set_answer("seniorDiscount", "Yes").unwrap();
    session.set_answer("age", "40").unwrap();

    let payload = session.begin_submit().unwrap();
    assert_eq!(payload, answers(&[("age", "40")]));
    // The session itself keeps the hidden answer.
    assert_eq!(session.answers().get("seniorDiscount"), Some("Yes"));
}

#[test]
fn test_explain_visibility_lists_every_rule() {
    let mut session = FormSession::new(forms(INSURANCE_SCHEMA));
    session.set_answer("smoker", "Yes").unwrap();

    let traces = explain_visibility(&session);
    let ids: Vec<&str> = traces.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["smoking_details", "security_provider"]);
    assert!(traces[0].1.outcome);
    assert!(!traces[1].1.outcome);
}

#[test]
fn test_group_ids_hold_no_answer() {
    let mut session = FormSession::new(forms(INSURANCE_SCHEMA));
    assert_eq!(
        session.set_answer("personal_info", "x"),
        Err(SessionError::GroupField("personal_info".to_string()))
    );
    assert_eq!(
        session.set_answer("smoking_history", "x"),
        Err(SessionError::GroupField("smoking_history".to_string()))
    );
    assert!(session.answers().is_empty());
    assert_eq!(session.state(), SessionState::Idle);

    session.set_answer("first_name", "Jane").unwrap();
    let payload = session.begin_submit().unwrap();
    assert_eq!(payload, answers(&[("first_name", "Jane")]));
}

#[test]
fn test_sessions_refuse_forms_sharing_an_id() {
    let mut first = forms(SCENARIO_A);
    let mut second = forms(SCENARIO_A);
    second[0].form_id = "travel_return".to_string();
    first.append(&mut second);

    assert_eq!(
        FormSession::try_new(first).map(|_| ()),
        Err(SchemaError::DuplicateFieldId {
            form_id: "travel_return".to_string(),
            field_id: "country".to_string(),
        })
    );
    assert!(FormSession::try_new(forms(INSURANCE_SCHEMA)).is_ok());
}

#[test]
fn test_abandoned_submit_returns_to_editing() {
    let mut session = jane();
    assert!(!session.abandon_submit());

    session.begin_submit().unwrap();
    assert!(session.abandon_submit());
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.answers().len(), 2);

    // A late outcome for the abandoned submission is rejected.
    assert_eq!(session.complete_submit(Ok(())), Err(SessionError::NotSubmitting));
    assert_eq!(session.answers().len(), 2);
    assert!(session.begin_submit().is_ok());
}
