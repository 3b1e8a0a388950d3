use visage::{
    Affect, BufferedSink, ClientConfig, ClientEvent, EmotionLabel, FaceClient, Notice,
    ScenePainter, ServerEvent, TimestampMs,
};

fn client_with(config: ClientConfig) -> FaceClient {
    FaceClient::new(config).unwrap()
}

#[test]
fn wire_push_to_settled_pose() {
    // The full inbound path: JSON off the socket, queued, drained,
    // animated to completion, drawn.
    let mut client = client_with(ClientConfig::default());
    let mut painter = ScenePainter::new();

    let json = r#"{"event":"update_expression","data":{"mouthCurve":40.0,"mouthWidth":2.5}}"#;
    client.push_event(ServerEvent::from_json(json).unwrap());
    client.drain_inbox(TimestampMs(0.0));

    let mut now = 0.0;
    while client.wants_frames() {
        now += 100.0;
        let again = client.on_frame(TimestampMs(now), &mut painter).unwrap();
        if !again {
            break;
        }
    }

    assert_eq!(client.current_params().get("mouthCurve"), Some(40.0));
    assert_eq!(client.current_params().get("mouthWidth"), Some(2.5));
    assert!(painter.draw_count() > 0);
    assert!(painter.last_scene().is_some());
}

#[test]
fn chat_round_trip_with_streamed_reply() {
    let mut client = client_with(ClientConfig::default());
    let mut sink = BufferedSink::new();

    client.send_message("hello there", &mut sink).unwrap();
    assert_eq!(
        sink.drain(),
        vec![ClientEvent::UserMessage {
            content: "hello there".to_string()
        }]
    );

    for chunk in ["Hi", "! How", " are you?"] {
        client.push_event(ServerEvent::ChatStreamChunk {
            text: chunk.to_string(),
        });
    }
    client.drain_inbox(TimestampMs(0.0));
    assert_eq!(client.transcript().streaming_text(), Some("Hi! How are you?"));

    client.push_event(ServerEvent::ChatStreamEnd {
        full_text: "Hi! How are you?".to_string(),
    });
    client.drain_inbox(TimestampMs(0.0));
    assert_eq!(client.transcript().len(), 2);
    assert_eq!(client.transcript().streaming_text(), None);
}

#[test]
fn capture_workflow_walks_all_six_labels() {
    let mut client = client_with(ClientConfig::default());
    let mut sink = BufferedSink::new();

    let mut saved_labels = Vec::new();
    loop {
        saved_labels.push(client.session().current());
        let next = client.save_capture("2025-01-01 09:00:00", &mut sink).unwrap();
        client.push_event(ServerEvent::SaveResult {
            success: true,
            message: "saved".to_string(),
        });
        let notices = client.drain_inbox(TimestampMs(0.0));
        assert_eq!(notices.len(), 1);
        if next.is_none() {
            break;
        }
    }

    assert_eq!(saved_labels.len(), EmotionLabel::ALL.len());
    assert_eq!(sink.sent().len(), EmotionLabel::ALL.len());

    // Every capture row is a flat object with metadata and parameters.
    let ClientEvent::SaveCapture(first) = &sink.sent()[0] else {
        panic!("expected a capture");
    };
    let row = serde_json::to_value(first).unwrap();
    assert_eq!(row["subjectId"], client.subject_id());
    assert_eq!(row["emotionLabel"], "normal");
    assert!(row["eyeOpenness"].is_number());
}

#[test]
fn server_error_surfaces_without_touching_animation() {
    let mut client = client_with(ClientConfig::default());
    let before = client.current_params().clone();

    client.push_event(ServerEvent::Error {
        message: "inference backend unavailable".to_string(),
    });
    let notices = client.drain_inbox(TimestampMs(0.0));

    assert_eq!(
        notices,
        vec![Notice::ServerError {
            message: "inference backend unavailable".to_string()
        }]
    );
    assert_eq!(*client.current_params(), before);
    assert!(!client.wants_frames());
}

#[test]
fn continuous_variant_draws_while_idle() {
    let config = ClientConfig {
        continuous_redraw: true,
        ..ClientConfig::default()
    };
    let mut client = client_with(config);
    let mut painter = ScenePainter::new();

    // No animation armed, yet every frame draws and asks for more.
    for i in 0..3 {
        let again = client
            .on_frame(TimestampMs(f64::from(i) * 16.0), &mut painter)
            .unwrap();
        assert!(again);
    }
    assert_eq!(painter.draw_count(), 3);
}

#[test]
fn history_less_variant_keeps_single_exchange() {
    let config = ClientConfig {
        retain_chat_history: false,
        ..ClientConfig::default()
    };
    let mut client = client_with(config);
    let mut sink = BufferedSink::new();

    client.send_message("one", &mut sink).unwrap();
    client.push_event(ServerEvent::ChatStreamEnd {
        full_text: "reply one".to_string(),
    });
    client.drain_inbox(TimestampMs(0.0));
    client.send_message("two", &mut sink).unwrap();

    assert_eq!(client.transcript().len(), 1);
    assert_eq!(client.transcript().messages()[0].content, "two");
}

#[test]
fn manual_trigger_and_local_preview_agree_on_target() {
    let mut client = client_with(ClientConfig::default());
    let mut painter = ScenePainter::new();
    let mut sink = BufferedSink::new();
    let affect = Affect::new(4.45, 0.85);

    client.request_expression(affect, &mut sink).unwrap();
    let ClientEvent::ManualExpressionRequest { valence, arousal } = &sink.sent()[0] else {
        panic!("expected a manual request");
    };
    assert_eq!((*valence, *arousal), (4.45, 0.85));

    // The local preview animates toward the same pose the service
    // would compute for that coordinate.
    client.preview_expression(affect, TimestampMs(0.0));
    client.on_frame(TimestampMs(2000.0), &mut painter).unwrap();
    let expected = visage::interpolate_expression(affect);
    assert_eq!(
        client.current_params().get("mouthCurve"),
        expected.get("mouthCurve")
    );
}
