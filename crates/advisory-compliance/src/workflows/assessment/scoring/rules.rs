use super::super::domain::{Answer, Question, RiskLabel};
use super::{ScoreComponent, SevereFinding};

pub(crate) fn score_answers(
    questions: &[Question],
    answers: &[Answer],
) -> (Vec<ScoreComponent>, u32, Option<SevereFinding>) {
    let mut components = Vec::new();
    let mut total: u32 = 0;
    let mut severe: Option<SevereFinding> = None;

    for question in questions {
        let answer = answers.iter().find(|answer| answer.question == question.key);

        let Some(answer) = answer else {
            components.push(ScoreComponent {
                question: question.key.to_string(),
                score: 0,
                notes: "not answered".to_string(),
            });
            continue;
        };

        let Some(option) = question.option_for(answer.value) else {
            // Values outside the defined options are a caller bug; they
            // contribute nothing rather than aborting the walk.
            components.push(ScoreComponent {
                question: question.key.to_string(),
                score: 0,
                notes: format!("value {} matches no defined option", answer.value),
            });
            continue;
        };

        total += option.score;
        components.push(ScoreComponent {
            question: question.key.to_string(),
            score: option.score,
            notes: option.label.to_string(),
        });

        if option.risk == RiskLabel::High && severe.is_none() {
            severe = Some(SevereFinding {
                question: question.key.to_string(),
                option_label: option.label.to_string(),
            });
        }
    }

    (components, total, severe)
}
