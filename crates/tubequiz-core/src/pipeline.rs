use tracing::info;

use crate::{
    error::Result,
    llm::LanguageModel,
    quiz::{Quiz, QuizContract, RawQuiz, generate_quiz},
    session::QuizSession,
    summary::summarize,
    transcript::TranscriptService,
    types::Transcript,
    video_id::extract_video_id,
};

/// Resolve the URL to a video id and fetch its transcript
///
/// An unparseable URL fails before the transcript service is called.
pub async fn fetch_transcript(service: &dyn TranscriptService, url: &str) -> Result<Transcript> {
    let video_id = extract_video_id(url)?;
    info!(%video_id, "fetching transcript");
    service.fetch(&video_id).await
}

/// URL to bullet-point summary
pub async fn summarize_video(
    service: &dyn TranscriptService,
    model: &dyn LanguageModel,
    url: &str,
) -> Result<String> {
    let transcript = fetch_transcript(service, url).await?;
    summarize(model, &transcript.plain_text()).await
}

/// URL to a quiz stored in `session`, replacing any quiz it held before
pub async fn quiz_video<'s>(
    service: &dyn TranscriptService,
    model: &dyn LanguageModel,
    url: &str,
    contract: QuizContract,
    session: &'s mut QuizSession,
) -> Result<&'s Quiz> {
    session.begin_generation();
    let transcript = fetch_transcript(service, url).await?;
    quiz_text(model, &transcript.plain_text(), contract, session).await
}

/// Transcript text already on hand to a quiz stored in `session`
pub async fn quiz_text<'s>(
    model: &dyn LanguageModel,
    transcript_text: &str,
    contract: QuizContract,
    session: &'s mut QuizSession,
) -> Result<&'s Quiz> {
    session.begin_generation();
    let raw = generate_quiz(model, transcript_text, contract).await?;
    install_raw_quiz(session, raw)
}

/// Parse an already generated model response into `session`
pub fn install_raw_quiz(session: &mut QuizSession, raw: RawQuiz) -> Result<&Quiz> {
    session.begin_generation();
    let quiz = raw.parse()?;
    Ok(session.install(raw, quiz))
}
