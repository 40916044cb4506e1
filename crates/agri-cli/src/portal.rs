//! Forms portal commands: drafting forms and reviewing submissions.

use agri_model::RecordId;
use agri_state::{AppState, FormSession, SubmissionFilter};
use anyhow::{Context, Result};

use crate::cli::{FormsCommand, StepArg, SubmissionsCommand};
use crate::commands::report_update;
use crate::summary::{print_catalog, print_draft, print_submission, print_submissions};

fn current_draft(state: &AppState) -> Result<&FormSession> {
    state
        .form_draft()
        .context("no form in progress; start one with `agri-shield forms open <FORM>`")
}

pub fn run_forms(cmd: FormsCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        FormsCommand::Catalog => print_catalog(),
        FormsCommand::Open { form } => {
            state.start_form(form);
            print_draft(current_draft(state)?, false);
        }
        FormsCommand::Update { id } => {
            state.start_form_update(&RecordId::from(id))?;
            let draft = current_draft(state)?;
            if let Some(comment) = state
                .find_submission(draft.updating().context("update draft without a submission")?)
                .and_then(|s| s.review_comment.as_deref())
            {
                println!("Reviewer comment: {comment}");
            }
            print_draft(draft, false);
        }
        FormsCommand::Show { flagged } => print_draft(current_draft(state)?, flagged),
        FormsCommand::Set { field, value } => {
            state.edit_form_draft(|draft| draft.set_raw(&field, &value))?;
            println!("{field} set.");
        }
        FormsCommand::Clear { field } => {
            let previous = state.edit_form_draft(|draft| Ok(draft.clear_value(&field)))?;
            match previous {
                Some(_) => println!("{field} cleared."),
                None => println!("{field} was not set."),
            }
        }
        FormsCommand::Step { step } => {
            state.edit_form_draft(|draft| {
                Ok(match step {
                    StepArg::Next => draft.next_step(),
                    StepArg::Previous => draft.previous_step(),
                    StepArg::To(n) => draft.go_to_step(n),
                })
            })?;
            print_draft(current_draft(state)?, false);
        }
        FormsCommand::Submit => {
            let id = state.submit_form()?;
            println!("Form filed as submission {id}.");
        }
        FormsCommand::Discard => match state.discard_form_draft() {
            Some(draft) => println!("Discarded draft of {}.", draft.form_type()),
            None => println!("No form in progress."),
        },
    }
    Ok(())
}

pub fn run_submissions(cmd: SubmissionsCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        SubmissionsCommand::List {
            status,
            form_type,
            search,
        } => {
            let filter = SubmissionFilter {
                status,
                form_type,
                search,
            };
            print_submissions(&state.filter_submissions(&filter));
            println!("{} pending.", state.pending_submission_count());
        }
        SubmissionsCommand::Show { id } => {
            let id = RecordId::from(id);
            let submission = state
                .find_submission(&id)
                .with_context(|| format!("no submission with id {id}"))?;
            print_submission(submission);
        }
        SubmissionsCommand::Process => {
            let moved = state.batch_process_submissions()?;
            println!("{moved} submission(s) moved under review.");
        }
        SubmissionsCommand::Return {
            id,
            fields,
            comment,
        } => {
            let id = RecordId::from(id);
            let outcome = state.return_submission_for_update(&id, &fields, comment)?;
            report_update("submission", &id, outcome, "returned for update");
        }
        SubmissionsCommand::Approve { id } => {
            let id = RecordId::from(id);
            let outcome = state.approve_submission(&id)?;
            report_update("submission", &id, outcome, "approved");
        }
        SubmissionsCommand::Reject { id, comment } => {
            let id = RecordId::from(id);
            let outcome = state.reject_submission(&id, comment)?;
            report_update("submission", &id, outcome, "rejected");
        }
    }
    Ok(())
}
