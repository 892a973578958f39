use std::sync::{Arc, Mutex};
use std::time::Duration;

use nutrichat::{
    ChatController, ChatMessage, ControllerConfig, NutritionEstimate, ProfileForm, RenderSink,
    Transcript, UploadedFile, UserProfile,
};

fn controller() -> ChatController<Transcript> {
    ChatController::new(Transcript::new(), ControllerConfig::default())
}

fn form_with_weight(weight: &str) -> ProfileForm {
    ProfileForm {
        weight: weight.to_string(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_blank_messages_are_ignored() {
    let chat = controller();

    assert!(!chat.send_text("").await);
    assert!(!chat.send_text("   \t\n").await);
    chat.drain().await;

    chat.inspect(|t| {
        assert!(t.is_empty());
        assert_eq!(t.inputs_cleared, 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_text_message_then_card_after_delay() {
    let chat = controller();

    assert!(chat.send_text("  apple  ").await);
    chat.inspect(|t| {
        assert_eq!(t.len(), 1);
        assert_eq!(
            t.entries[0].message,
            ChatMessage::UserText {
                text: "apple".to_string()
            }
        );
        assert_eq!(t.inputs_cleared, 1);
        assert!(t.is_scrolled_to_bottom());
    })
    .await;

    // Nothing before the delay is up.
    tokio::time::sleep(Duration::from_millis(999)).await;
    chat.inspect(|t| assert_eq!(t.len(), 1)).await;

    tokio::time::sleep(Duration::from_millis(2)).await;
    chat.inspect(|t| {
        assert_eq!(t.len(), 2);
        assert_eq!(
            t.entries[1].message,
            ChatMessage::BotCard {
                sentence: "Estimated breakdown for 'apple':".to_string(),
                estimate: NutritionEstimate {
                    total_calories: 150,
                    protein_grams: 15,
                    fat_grams: 10,
                },
            }
        );
        assert!(t.is_scrolled_to_bottom());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_weight_adjusts_calories() {
    let chat = controller();
    chat.save_profile(form_with_weight("70")).await;

    chat.send_text("apple").await;
    chat.drain().await;

    chat.inspect(|t| {
        assert_eq!(t.cards()[0].total_calories, 220);
        let Some(ChatMessage::BotCard { sentence, .. }) = t.messages().last() else {
            panic!("expected a card last");
        };
        assert_eq!(
            sentence,
            "Estimated breakdown for 'apple': (adjusted for your 70 kg profile)."
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_non_numeric_weight_falls_back_to_baseline() {
    let chat = controller();
    chat.save_profile(form_with_weight("a lot")).await;

    chat.send_text("cake").await;
    chat.drain().await;

    chat.inspect(|t| assert_eq!(t.cards()[0].total_calories, 150)).await;
}

#[tokio::test(start_paused = true)]
async fn test_image_upload_shows_photo_and_card() {
    let chat = controller();
    chat.replace_profile(UserProfile {
        weight: Some("70".to_string()),
        ..Default::default()
    })
    .await;

    let file = UploadedFile::from_bytes("lunch.png", b"abc".to_vec());
    assert!(chat.upload_image(Some(file)).await);
    chat.drain().await;

    chat.inspect(|t| {
        assert_eq!(t.len(), 2);
        assert!(t.messages().any(|m| matches!(
            m,
            ChatMessage::UserImage { name, data_url }
                if name == "lunch.png" && data_url == "data:image/png;base64,YWJj"
        )));
        assert_eq!(
            t.cards(),
            vec![NutritionEstimate {
                total_calories: 320,
                protein_grams: 25,
                fat_grams: 12,
            }]
        );
        let Some(ChatMessage::BotCard { sentence, .. }) =
            t.messages().find(|m| matches!(m, ChatMessage::BotCard { .. }))
        else {
            panic!("expected a card");
        };
        assert!(sentence.starts_with("Analyzing the photo you sent ('lunch.png')."));
        assert!(t.is_scrolled_to_bottom());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_image_card_is_text_value_plus_hundred() {
    let chat = controller();

    chat.send_text("lunch.png").await;
    chat.upload_image(Some(UploadedFile::from_bytes("lunch.png", vec![1, 2, 3])))
        .await;
    chat.drain().await;

    chat.inspect(|t| {
        let cards = t.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].total_calories, cards[0].total_calories + 100);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_picker_does_nothing() {
    let chat = controller();

    assert!(!chat.upload_image(None).await);
    chat.drain().await;

    chat.inspect(|t| {
        assert!(t.is_empty());
        assert_eq!(t.file_picker_resets, 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_same_file_can_be_uploaded_twice() {
    let chat = controller();
    let file = UploadedFile::from_bytes("soup.jpg", b"soup".to_vec());

    assert!(chat.upload_image(Some(file.clone())).await);
    assert!(chat.upload_image(Some(file)).await);
    chat.drain().await;

    chat.inspect(|t| {
        assert_eq!(t.file_picker_resets, 2);
        assert_eq!(t.cards().len(), 2);
        let images = t
            .messages()
            .filter(|m| matches!(m, ChatMessage::UserImage { .. }))
            .count();
        assert_eq!(images, 2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_upload_still_gets_a_card() {
    let chat = controller();

    let file = UploadedFile::from_base64("broken.png", None, "%%%not base64%%%");
    chat.upload_image(Some(file)).await;
    chat.drain().await;

    chat.inspect(|t| {
        assert_eq!(t.len(), 1);
        assert_eq!(t.cards()[0].total_calories, 250);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_save_profile_closes_editor_and_confirms_once() {
    let chat = controller();

    chat.open_profile_editor().await;
    assert!(chat.is_profile_editor_open().await);
    chat.inspect(|t| assert!(t.modal_visible)).await;

    chat.save_profile(ProfileForm {
        age: "not a number".to_string(),
        gender: "x".to_string(),
        height: "-1".to_string(),
        weight: "??".to_string(),
        activity: String::new(),
    })
    .await;

    assert!(!chat.is_profile_editor_open().await);
    chat.inspect(|t| {
        assert!(!t.modal_visible);
        assert_eq!(t.len(), 1);
        assert_eq!(
            t.entries[0].message,
            ChatMessage::BotText {
                text: "Your profile has been updated successfully!".to_string()
            }
        );
        assert!(t.is_scrolled_to_bottom());
    })
    .await;

    let profile = chat.profile().await;
    assert_eq!(profile.age.as_deref(), Some("not a number"));
    assert_eq!(profile.weight.as_deref(), Some("??"));
    assert!(profile.activity.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_save_replaces_whole_profile() {
    let chat = controller();

    chat.save_profile(ProfileForm {
        age: "30".to_string(),
        weight: "70".to_string(),
        ..Default::default()
    })
    .await;
    chat.save_profile(form_with_weight("80")).await;

    let profile = chat.profile().await;
    assert!(profile.age.is_none());
    assert_eq!(profile.weight(), Some("80"));
}

#[tokio::test(start_paused = true)]
async fn test_close_without_saving_keeps_profile() {
    let chat = controller();
    chat.save_profile(form_with_weight("70")).await;

    chat.open_profile_editor().await;
    chat.close_profile_editor().await;

    assert!(!chat.is_profile_editor_open().await);
    assert_eq!(chat.profile().await.weight(), Some("70"));
    chat.inspect(|t| assert_eq!(t.len(), 1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_replace_profile_returns_previous() {
    let chat = controller();
    let old = chat
        .replace_profile(UserProfile {
            weight: Some("60".to_string()),
            ..Default::default()
        })
        .await;
    assert_eq!(old, UserProfile::default());
    assert_eq!(chat.profile().await.weight(), Some("60"));
}

#[tokio::test(start_paused = true)]
async fn test_reply_uses_profile_at_reply_time() {
    let chat = controller();

    chat.send_text("rice").await;
    chat.save_profile(form_with_weight("50")).await;
    chat.drain().await;

    chat.inspect(|t| assert_eq!(t.cards()[0].total_calories, 200)).await;
}

#[tokio::test(start_paused = true)]
async fn test_render_bot_response_is_immediate() {
    let chat = controller();
    chat.render_bot_response("banana", true).await;
    chat.inspect(|t| {
        assert_eq!(t.cards()[0].total_calories, 250);
        assert!(t.is_scrolled_to_bottom());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_delay() {
    let chat = ChatController::new(
        Transcript::new(),
        ControllerConfig {
            response_delay: Duration::from_millis(50),
        },
    );

    chat.send_text("tea").await;
    tokio::time::sleep(Duration::from_millis(51)).await;
    chat.inspect(|t| assert_eq!(t.cards().len(), 1)).await;
}

/// Keeps appended messages where the test can still see them after the
/// controller is gone.
#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<ChatMessage>>>);

impl RenderSink for SharedLog {
    fn append(&mut self, message: ChatMessage) {
        self.0.lock().unwrap().push(message);
    }
    fn scroll_to_end(&mut self) {}
    fn clear_input(&mut self) {}
    fn set_modal_visible(&mut self, _visible: bool) {}
    fn reset_file_picker(&mut self) {}
}

#[tokio::test(start_paused = true)]
async fn test_reply_arrives_after_controller_is_dropped() {
    let log = SharedLog::default();
    let chat = ChatController::new(log.clone(), ControllerConfig::default());

    chat.send_text("apple").await;
    chat.upload_image(Some(UploadedFile::from_bytes("lunch.png", b"abc".to_vec())))
        .await;
    drop(chat);
    tokio::time::sleep(Duration::from_secs(2)).await;

    let messages = log.0.lock().unwrap();
    assert_eq!(messages.len(), 4);
    let cards = messages
        .iter()
        .filter(|m| matches!(m, ChatMessage::BotCard { .. }))
        .count();
    assert_eq!(cards, 2);
}
