// tests/workflow_engine_tests.rs
mod common;

use common::*;
use mixline::workflow::edge_kind;
use mixline::{
  AuditAction, Category, MissingInput, OrderStatus, Role, SuppliedInputs, TransactionId, TransitionOutcome,
  TransitionRequest, WorkflowError,
};
use serial_test::serial;

use OrderStatus::{Cancelled, Complete, Mixing, ReMixing, Ready, Spraying, Waiting};

fn committed(outcome: TransitionOutcome) -> mixline::Order {
  match outcome {
    TransitionOutcome::Committed { order, audit_warning } => {
      assert!(audit_warning.is_none(), "unexpected audit warning: {:?}", audit_warning);
      order
    }
    other => panic!("Expected a commit, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_stage_change_asks_for_employee_then_commits() {
  let h = harness([order_at("T100", Category::NewMix, Waiting)]);
  let order = h.stored("T100");

  let first = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Mixing, Role::Staff))
    .await
    .unwrap();
  assert_eq!(first.missing(), &[MissingInput::EmployeeCode]);
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.directory.lookups(), 0);
  assert!(h.audit.events().is_empty());
  assert_eq!(h.stored("T100"), order);

  let second = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Mixing, Role::Staff).with_employee_code(ALICE_CODE))
    .await
    .unwrap();
  let updated = committed(second);
  assert_eq!(updated.current_status, Mixing);
  assert_eq!(updated.assigned_employee, ALICE);
  assert!(updated.status_started_at > order.status_started_at);
  assert_eq!(h.stored("T100"), updated);

  let events = h.audit.events();
  assert_eq!(events.len(), 1);
  let event = &events[0];
  assert_eq!(event.order_id, TransactionId::new("T100"));
  assert_eq!(event.action, AuditAction::Advance);
  assert_eq!(event.from_status, Waiting);
  assert_eq!(event.to_status, Mixing);
  assert_eq!(event.employee_name, ALICE);
  assert_eq!(event.role, Role::Staff);
  assert_eq!(event.timestamp, updated.status_started_at);
  assert_eq!(event.remarks, None);
}

#[tokio::test]
#[serial]
async fn test_pending_colour_code_is_collected_with_employee() {
  let h = harness([order_at("T200", Category::NewMix, Spraying)]);
  let order = h.stored("T200");

  let first = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Ready, Role::Staff))
    .await
    .unwrap();
  assert_eq!(first.missing(), &[MissingInput::ColourCode, MissingInput::EmployeeCode]);

  let second = h
    .engine
    .request_transition(
      TransitionRequest::new(order, Ready, Role::Staff)
        .with_colour_code("5W")
        .with_employee_code(RAJ_CODE),
    )
    .await
    .unwrap();
  let updated = committed(second);
  assert_eq!(updated.current_status, Ready);
  assert_eq!(updated.colour_code.as_deref(), Some("5W"));
  assert_eq!(updated.assigned_employee, RAJ);

  let events = h.audit.events();
  assert_eq!(events.len(), 1);
  assert_eq!((events[0].from_status, events[0].to_status), (Spraying, Ready));
}

#[tokio::test]
#[serial]
async fn test_needs_input_is_repeatable_and_changes_nothing() {
  let h = harness([order_at("T300", Category::MixMore, Mixing)]);
  let order = h.stored("T300");

  for _ in 0..3 {
    let outcome = h
      .engine
      .request_transition(TransitionRequest::new(order.clone(), Spraying, Role::Staff))
      .await
      .unwrap();
    assert!(outcome.committed().is_none());
    assert_eq!(outcome.missing(), &[MissingInput::EmployeeCode]);
  }
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.audit.attempts(), 0);
  assert_eq!(h.stored("T300"), order);
}

#[tokio::test]
#[serial]
async fn test_detailing_commits_without_inputs_and_keeps_employee() {
  let mut order = order_at("D100", Category::Detailing, Mixing);
  order.assigned_employee = RAJ.to_string();
  let h = harness([order.clone()]);

  let outcome = h
    .engine
    .request_transition(TransitionRequest::new(order, Spraying, Role::Staff))
    .await
    .unwrap();
  let updated = committed(outcome);
  assert_eq!(updated.current_status, Spraying);
  assert_eq!(updated.assigned_employee, RAJ);
  assert_eq!(h.directory.lookups(), 0);
  assert_eq!(h.audit.events()[0].employee_name, RAJ);
}

#[tokio::test]
#[serial]
async fn test_illegal_pairs_never_commit() {
  let h = harness(Vec::<mixline::Order>::new());
  let inputs = SuppliedInputs {
    colour_code: Some("5W".to_string()),
    employee_code: Some(ALICE_CODE.to_string()),
    reason: Some("testing".to_string()),
  };

  for from in OrderStatus::ALL {
    for to in OrderStatus::ALL {
      if edge_kind(from, to).is_some() {
        continue;
      }
      let request =
        TransitionRequest::new(order_at("X1", Category::NewMix, from), to, Role::Admin).with_inputs(inputs.clone());
      let err = h.engine.request_transition(request).await.unwrap_err();
      assert!(
        matches!(err, WorkflowError::IllegalTransition { from: f, to: t } if f == from && t == to),
        "{} -> {} gave {:?}",
        from,
        to,
        err
      );
      assert!(err.is_local());
    }
  }
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.directory.lookups(), 0);
  assert_eq!(h.audit.attempts(), 0);
}

#[tokio::test]
#[serial]
async fn test_staff_cannot_complete_or_revert() {
  let h = harness([order_at("T400", Category::NewMix, Ready)]);
  let order = h.stored("T400");

  for target in [Complete, Spraying, ReMixing, Cancelled] {
    let request = TransitionRequest::new(order.clone(), target, Role::Staff)
      .with_employee_code(ALICE_CODE)
      .with_reason("customer asked");
    let err = h.engine.request_transition(request).await.unwrap_err();
    assert!(
      matches!(err, WorkflowError::Forbidden { role: Role::Staff, from: Ready, to } if to == target),
      "got {:?}",
      err
    );
  }
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.directory.lookups(), 0);
}

#[tokio::test]
#[serial]
async fn test_revert_without_reason_is_rejected_locally() {
  let h = harness([order_at("T500", Category::ColourCode, Ready)]);
  let order = h.stored("T500");

  let err = h
    .engine
    .request_transition(TransitionRequest::new(order, ReMixing, Role::Admin).with_employee_code(ALICE_CODE))
    .await
    .unwrap_err();

  assert!(matches!(err, WorkflowError::MissingReason { from: Ready, to: ReMixing }));
  assert_eq!(h.directory.lookups(), 0);
  assert_eq!(h.repo.commit_calls(), 0);
}

#[tokio::test]
#[serial]
async fn test_revert_collects_employee_and_notes_reason() {
  let mut order = order_at("T600", Category::NewMix, Ready);
  order.colour_code = Some("NX-12".to_string());
  order.note = Some("Rush job".to_string());
  let h = harness([order.clone()]);

  let first = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Spraying, Role::Admin).with_reason("Orange peel"))
    .await
    .unwrap();
  assert_eq!(first.missing(), &[MissingInput::EmployeeCode]);

  let second = h
    .engine
    .request_transition(
      TransitionRequest::new(order, Spraying, Role::Admin)
        .with_reason("Orange peel")
        .with_employee_code(ALICE_CODE),
    )
    .await
    .unwrap();
  let updated = committed(second);
  assert_eq!(updated.current_status, Spraying);
  assert_eq!(updated.assigned_employee, ALICE);
  assert_eq!(updated.colour_code.as_deref(), Some("NX-12"));
  assert_eq!(
    updated.note.as_deref(),
    Some("Rush job\nReverted from Ready to Spraying: Orange peel")
  );

  let event = &h.audit.events()[0];
  assert_eq!(event.action, AuditAction::Revert);
  assert_eq!(event.role, Role::Admin);
  assert_eq!(event.remarks.as_deref(), Some("Orange peel"));
}

#[tokio::test]
#[serial]
async fn test_admin_cancel_records_reason() {
  let mut order = order_at("T700", Category::MixMore, Mixing);
  order.assigned_employee = ALICE.to_string();
  let h = harness([order.clone()]);

  let outcome = h
    .engine
    .request_transition(TransitionRequest::new(order, Cancelled, Role::Admin).with_reason("Customer left"))
    .await
    .unwrap();
  let updated = committed(outcome);
  assert_eq!(updated.current_status, Cancelled);
  assert_eq!(updated.assigned_employee, ALICE);
  assert_eq!(updated.note.as_deref(), Some("Cancelled from Mixing: Customer left"));
  assert_eq!(h.audit.events()[0].action, AuditAction::Cancel);
  assert!(h.engine.allowed_targets(updated.current_status, Role::Admin).is_empty());
}

#[tokio::test]
#[serial]
async fn test_admin_completes_ready_order() {
  let h = harness([order_at("T800", Category::Detailing, Ready)]);
  let order = h.stored("T800");

  let updated = committed(
    h.engine
      .request_transition(TransitionRequest::new(order, Complete, Role::Admin))
      .await
      .unwrap(),
  );
  assert_eq!(updated.current_status, Complete);
  let event = &h.audit.events()[0];
  assert_eq!(event.action, AuditAction::Complete);
  assert_eq!((event.from_status, event.to_status), (Ready, Complete));
}

#[tokio::test]
#[serial]
async fn test_unknown_employee_code_is_rejected() {
  let h = harness([order_at("T900", Category::NewMix, Waiting)]);
  let order = h.stored("T900");

  let err = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Mixing, Role::Staff).with_employee_code("E999"))
    .await
    .unwrap_err();

  assert!(matches!(err, WorkflowError::InvalidEmployeeCode { ref code } if code == "E999"));
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.stored("T900"), order);
}

#[tokio::test]
#[serial]
async fn test_stale_copy_conflicts_and_is_not_audited() {
  let h = harness([order_at("T1000", Category::MixMore, Waiting)]);
  let stale = h.stored("T1000");
  h.repo.insert(order_at("T1000", Category::MixMore, Mixing));

  let err = h
    .engine
    .request_transition(TransitionRequest::new(stale, Mixing, Role::Staff).with_employee_code(RAJ_CODE))
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    WorkflowError::Conflict {
      expected: Waiting,
      actual: Mixing,
      ..
    }
  ));
  assert_eq!(h.repo.commit_calls(), 1);
  assert_eq!(h.audit.attempts(), 0);
  assert_eq!(h.stored("T1000").assigned_employee, "Unassigned");
}

#[tokio::test]
#[serial]
async fn test_unavailable_collaborators_surface_without_commit() {
  let h = harness([order_at("T1100", Category::ColourCode, Mixing)]);
  let order = h.stored("T1100");

  h.directory.set_offline(true);
  let err = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Spraying, Role::Staff).with_employee_code(ALICE_CODE))
    .await
    .unwrap_err();
  assert!(matches!(err, WorkflowError::Unavailable { .. }));
  assert!(!err.is_local());
  assert_eq!(h.repo.commit_calls(), 0);

  h.directory.set_offline(false);
  h.repo.set_offline(true);
  let err = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Spraying, Role::Staff).with_employee_code(ALICE_CODE))
    .await
    .unwrap_err();
  assert!(matches!(err, WorkflowError::Unavailable { .. }));
  assert_eq!(h.audit.attempts(), 0);

  h.repo.set_offline(false);
  assert_eq!(h.stored("T1100"), order);
}

#[tokio::test]
#[serial]
async fn test_audit_failure_keeps_commit_and_warns() {
  let h = harness([order_at("T1200", Category::Detailing, Spraying)]);
  let order = h.stored("T1200");
  h.audit.set_failing(true);

  let outcome = h
    .engine
    .request_transition(TransitionRequest::new(order, Ready, Role::Staff))
    .await
    .unwrap();

  match outcome {
    TransitionOutcome::Committed { order, audit_warning } => {
      assert_eq!(order.current_status, Ready);
      let warning = audit_warning.expect("audit warning expected");
      assert_eq!(warning.event.to_status, Ready);
      assert!(!warning.message.is_empty());
    }
    other => panic!("Expected a commit, got {:?}", other),
  }
  assert_eq!(h.stored("T1200").current_status, Ready);
  assert_eq!(h.audit.attempts(), 1);
  assert!(h.audit.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_transition_by_id_loads_current_copy() {
  let h = harness([order_at("T1300", Category::MixMore, Spraying)]);

  let outcome = h
    .engine
    .transition_by_id(
      &TransactionId::new("T1300"),
      ReMixing,
      Role::Staff,
      SuppliedInputs {
        employee_code: Some(format!("  {}  ", RAJ_CODE)),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(committed(outcome).current_status, ReMixing);

  let err = h
    .engine
    .transition_by_id(&TransactionId::new("nope"), Mixing, Role::Staff, SuppliedInputs::default())
    .await
    .unwrap_err();
  assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[tokio::test]
#[serial]
async fn test_full_production_run_writes_one_event_per_commit() {
  let h = harness([order_at("T1400", Category::NewMix, Waiting)]);
  let id = TransactionId::new("T1400");
  let with_code = || SuppliedInputs {
    employee_code: Some(ALICE_CODE.to_string()),
    ..Default::default()
  };

  for target in [Mixing, Spraying, ReMixing, Spraying] {
    let outcome = h.engine.transition_by_id(&id, target, Role::Staff, with_code()).await.unwrap();
    assert_eq!(committed(outcome).current_status, target);
  }
  let finish = SuppliedInputs {
    colour_code: Some("5W".to_string()),
    ..with_code()
  };
  committed(h.engine.transition_by_id(&id, Ready, Role::Staff, finish).await.unwrap());
  committed(
    h.engine
      .transition_by_id(&id, Complete, Role::Admin, SuppliedInputs::default())
      .await
      .unwrap(),
  );

  let events = h.audit.events();
  let path: Vec<_> = events.iter().map(|e| (e.from_status, e.to_status)).collect();
  assert_eq!(
    path,
    vec![
      (Waiting, Mixing),
      (Mixing, Spraying),
      (Spraying, ReMixing),
      (ReMixing, Spraying),
      (Spraying, Ready),
      (Ready, Complete),
    ]
  );
  assert_eq!(h.repo.commit_calls(), events.len());
}

#[tokio::test]
#[serial]
async fn test_new_order_uses_configured_placeholders() {
  let config = mixline::WorkflowConfig {
    pending_sentinel: "TBD".to_string(),
    unassigned_label: "Nobody".to_string(),
    ..Default::default()
  };
  let h = harness_with_config(Vec::<mixline::Order>::new(), config);

  let order = h
    .engine
    .new_order(TransactionId::new("N1"), Category::NewMix, mixline::OrderType::Order);
  assert_eq!(order.current_status, Waiting);
  assert_eq!(order.colour_code.as_deref(), Some("TBD"));
  assert_eq!(order.assigned_employee, "Nobody");
  assert!(!order.is_paid());

  let mut spraying = order;
  spraying.current_status = Spraying;
  assert!(h.engine.requirements(&spraying, Ready).colour_code);
}

#[tokio::test]
#[serial]
async fn test_pending_colour_still_prompts_under_custom_sentinel() {
  let config = mixline::WorkflowConfig {
    pending_sentinel: "TBD".to_string(),
    ..Default::default()
  };
  let h = harness_with_config([order_at("T1500", Category::NewMix, Spraying)], config);
  let order = h.stored("T1500");
  assert_eq!(order.colour_code.as_deref(), Some("Pending"));

  let outcome = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Ready, Role::Staff))
    .await
    .unwrap();
  assert_eq!(outcome.missing(), &[MissingInput::ColourCode, MissingInput::EmployeeCode]);

  let outcome = h
    .engine
    .request_transition(
      TransitionRequest::new(order.clone(), Ready, Role::Staff)
        .with_colour_code("tbd")
        .with_employee_code(ALICE_CODE),
    )
    .await
    .unwrap();
  assert_eq!(outcome.missing(), &[MissingInput::ColourCode, MissingInput::EmployeeCode]);
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.stored("T1500"), order);
}

#[tokio::test]
#[serial]
async fn test_cancel_without_reason_is_rejected_locally() {
  let h = harness([order_at("T1600", Category::MixMore, Mixing)]);
  let order = h.stored("T1600");

  for reason in [None, Some("   ")] {
    let mut request = TransitionRequest::new(order.clone(), Cancelled, Role::Admin);
    if let Some(reason) = reason {
      request = request.with_reason(reason);
    }
    let err = h.engine.request_transition(request).await.unwrap_err();
    assert!(
      matches!(err, WorkflowError::MissingReason { from: Mixing, to: Cancelled }),
      "got {:?}",
      err
    );
    assert!(err.is_local());
  }
  assert_eq!(h.directory.lookups(), 0);
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.stored("T1600"), order);
}

#[tokio::test]
#[serial]
async fn test_blank_revert_reason_counts_as_missing() {
  let h = harness([order_at("T1700", Category::Detailing, Ready)]);
  let order = h.stored("T1700");

  let err = h
    .engine
    .request_transition(
      TransitionRequest::new(order, Spraying, Role::Admin)
        .with_reason(" \t ")
        .with_employee_code(ALICE_CODE),
    )
    .await
    .unwrap_err();

  assert!(matches!(err, WorkflowError::MissingReason { from: Ready, to: Spraying }));
  assert_eq!(h.directory.lookups(), 0);
  assert_eq!(h.repo.commit_calls(), 0);
}

#[tokio::test]
#[serial]
async fn test_staff_cannot_cancel_from_any_stage() {
  let h = harness(Vec::<mixline::Order>::new());

  for from in [Waiting, Mixing, Spraying, ReMixing] {
    let request = TransitionRequest::new(order_at("T1800", Category::NewMix, from), Cancelled, Role::Staff)
      .with_reason("Customer left");
    let err = h.engine.request_transition(request).await.unwrap_err();
    assert!(
      matches!(err, WorkflowError::Forbidden { role: Role::Staff, from: f, to: Cancelled } if f == from),
      "got {:?}",
      err
    );
  }
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.audit.attempts(), 0);
}

#[tokio::test]
#[serial]
async fn test_unrequested_employee_code_is_resolved_and_assigned() {
  let mut order = order_at("T1900", Category::Detailing, Mixing);
  order.assigned_employee = ALICE.to_string();
  let h = harness([order.clone()]);

  let outcome = h
    .engine
    .request_transition(TransitionRequest::new(order, Spraying, Role::Staff).with_employee_code(RAJ_CODE))
    .await
    .unwrap();
  let updated = committed(outcome);
  assert_eq!(updated.current_status, Spraying);
  assert_eq!(updated.assigned_employee, RAJ);
  assert_eq!(h.directory.lookups(), 1);
  assert_eq!(h.audit.events()[0].employee_name, RAJ);
}

#[tokio::test]
#[serial]
async fn test_unrequested_unknown_employee_code_is_rejected() {
  let h = harness([order_at("T2000", Category::Detailing, Mixing)]);
  let order = h.stored("T2000");

  let err = h
    .engine
    .request_transition(TransitionRequest::new(order.clone(), Spraying, Role::Staff).with_employee_code("E404"))
    .await
    .unwrap_err();

  assert!(matches!(err, WorkflowError::InvalidEmployeeCode { ref code } if code == "E404"));
  assert_eq!(h.repo.commit_calls(), 0);
  assert_eq!(h.audit.attempts(), 0);
  assert_eq!(h.stored("T2000"), order);
}
