mod common;

use serde_json::Value;
use voicebot::{Bot, Directive, Request};

use common::fixture;

#[test]
fn missing_slot_is_elicited_and_intent_echoed() {
    let mut bot = Bot::from_json(&fixture("intent-request.json")).expect("Should parse request");

    bot.on_intent(|ctx, request| {
        assert_eq!(request.intent_name(), Some("PlanTrip"));
        assert_eq!(request.slot_value("date"), Some("tomorrow"));

        match request.slot_value("city") {
            Some(city) => {
                ctx.response.tell(format!("Off to {city}!"));
            }
            None => {
                ctx.response.ask_slot("Which city are you heading to?", "city");
            }
        }
        Ok(())
    });

    let output = bot.handle().expect("Should produce a response");
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["response"]["shouldEndSession"], false);
    assert_eq!(
        value["response"]["outputSpeech"]["text"],
        "Which city are you heading to?"
    );

    let directives = value["response"]["directives"]
        .as_array()
        .expect("Should carry directives");
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0]["type"], "Dialog.ElicitSlot");
    assert_eq!(directives[0]["slotToElicit"], "city");
    assert_eq!(directives[0]["updatedIntent"]["name"], "PlanTrip");

    // Current intent is echoed back for the platform's dialog context.
    assert_eq!(value["context"]["intent"]["name"], "PlanTrip");
}

#[test]
fn elicit_directive_comes_after_command_directives() {
    let mut bot = Bot::from_json(&fixture("intent-request.json")).expect("Should parse request");

    bot.on_intent(|ctx, _request| {
        ctx.response.command(Directive::audio_stop());
        ctx.response.ask_slot("Which city?", "city");
        Ok(())
    });

    let value: Value = serde_json::from_str(&bot.handle().unwrap()).unwrap();
    let directives = value["response"]["directives"].as_array().unwrap();
    assert_eq!(directives.len(), 2);
    assert_eq!(directives[0]["type"], "AudioPlayer.Stop");
    assert_eq!(directives[1]["type"], "Dialog.ElicitSlot");
}

#[test]
fn session_attributes_written_by_handlers_are_echoed() {
    let mut bot = Bot::from_json(&fixture("intent-request.json")).expect("Should parse request");
    assert_eq!(
        bot.session().attribute("turns"),
        Some(&Value::from(1))
    );

    bot.on_intent(|ctx, _request| {
        ctx.session.set_attribute("turns", 2);
        ctx.response.tell("noted");
        Ok(())
    });

    let value: Value = serde_json::from_str(&bot.handle().unwrap()).unwrap();
    assert_eq!(value["session"]["attributes"]["turns"], 2);
}

#[test]
fn play_directive_token_round_trips_to_the_wire() {
    let mut bot = Bot::from_json(&fixture("intent-request.json")).expect("Should parse request");

    bot.on_intent(|ctx, _request| {
        ctx.response
            .tell("Here is your soundtrack")
            .command(Directive::audio_play("https://example.com/trip.mp3"));
        Ok(())
    });

    bot.run().expect("Should dispatch");
    let token = bot.response().directives()[0]
        .token()
        .expect("Play directive should carry a token")
        .to_string();

    let value: Value = serde_json::from_str(&bot.build().unwrap()).unwrap();
    assert_eq!(value["response"]["directives"][0]["token"], token.as_str());
}

#[test]
fn session_end_reason_is_visible_to_handlers() {
    let mut bot =
        Bot::from_json(&fixture("session-ended-request.json")).expect("Should parse request");

    bot.on_session_ended(|ctx, request| {
        assert_eq!(request.reason, "USER_INITIATED");
        ctx.session.set_attribute("ended", true);
        Ok(())
    });

    let value: Value = serde_json::from_str(&bot.handle().unwrap()).unwrap();
    assert_eq!(value["session"]["attributes"]["ended"], true);
    assert!(matches!(bot.request(), Request::SessionEnded(_)));
}
