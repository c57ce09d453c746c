/*!
 * Integration tests for catalog queries over the seeded store
 */

use anyhow::Result;
use std::collections::{HashMap, HashSet};

use enem_api::{Pagination, QuestionFilter};
use crate::common::{
    self, FIRST_QUESTION_ID, LAST_QUESTION_ID, LETTERS, QUESTIONS_PER_YEAR, SEEDED_YEARS,
    TOTAL_QUESTIONS, UNANSWERED_INDEX,
};

/// Test the default page of an unfiltered listing
#[tokio::test]
async fn test_listQuestions_withDefaults_shouldReturnFirstTenOfNewestYear() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(&QuestionFilter::new(), Pagination::default())
        .await?;

    assert_eq!(page.total, TOTAL_QUESTIONS);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    assert_eq!(page.total_pages, 8);

    let ids: Vec<i64> = page.data.iter().map(|q| q.id).collect();
    assert_eq!(ids, (2551..=2560).collect::<Vec<_>>());
    assert!(page.data.iter().all(|q| q.year == 2023));

    Ok(())
}

/// Test the year filter with a small page size
#[tokio::test]
async fn test_listQuestions_withYearAndLimitThree_shouldReportNinePages() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(&QuestionFilter::new().with_year(2023), Pagination::new(1, 3)?)
        .await?;

    assert_eq!(page.total, QUESTIONS_PER_YEAR);
    assert_eq!(page.total_pages, 9);
    assert_eq!(page.data.len(), 3);
    assert!(page.data.iter().all(|q| q.year == 2023));

    // Same index in two languages comes out in id order
    let indexes: Vec<i64> = page.data.iter().map(|q| q.index).collect();
    assert_eq!(indexes, vec![1, 1, 2]);

    Ok(())
}

/// Test that walking every page yields each question exactly once, in listing order
#[tokio::test]
async fn test_listQuestions_acrossAllPages_shouldPartitionMatches() -> Result<()> {
    let repository = common::seeded_repository();
    let filter = QuestionFilter::new();

    let first = repository.list_questions(&filter, Pagination::new(1, 7)?).await?;
    assert_eq!(first.total_pages, 11);

    let mut questions = Vec::new();
    for page in 1..=first.total_pages {
        let result = repository.list_questions(&filter, Pagination::new(page, 7)?).await?;
        assert_eq!(result.total, TOTAL_QUESTIONS);
        questions.extend(result.data);
    }

    assert_eq!(questions.len() as i64, TOTAL_QUESTIONS);

    let unique: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    assert_eq!(unique.len() as i64, TOTAL_QUESTIONS);

    for pair in questions.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let key_a = (-a.year, a.index, a.id);
        let key_b = (-b.year, b.index, b.id);
        assert!(key_a < key_b, "{:?} listed before {:?}", key_a, key_b);
    }

    Ok(())
}

/// Test a page past the end of the result set
#[tokio::test]
async fn test_listQuestions_withPageBeyondEnd_shouldReturnNoDataButKeepTotal() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(&QuestionFilter::new(), Pagination::new(50, 10)?)
        .await?;

    assert!(page.data.is_empty());
    assert_eq!(page.total, TOTAL_QUESTIONS);
    assert_eq!(page.page, 50);
    assert_eq!(page.total_pages, 8);

    Ok(())
}

/// Test that all filter fields must match together
#[tokio::test]
async fn test_listQuestions_withAllFilters_shouldMatchConjunctively() -> Result<()> {
    let repository = common::seeded_repository();
    let filter = QuestionFilter::new()
        .with_year(2022)
        .with_discipline("linguagens")
        .with_language("espanhol");

    let page = repository.list_questions(&filter, Pagination::new(1, 100)?).await?;

    assert_eq!(page.total, 5);
    for question in &page.data {
        assert_eq!(question.year, 2022);
        assert_eq!(question.discipline.as_ref().map(|d| d.value.as_str()), Some("linguagens"));
        assert_eq!(question.language.as_ref().map(|l| l.value.as_str()), Some("espanhol"));
    }

    Ok(())
}

/// Test a discipline filter across years
#[tokio::test]
async fn test_listQuestions_withDisciplineFilter_shouldSpanAllYears() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(
            &QuestionFilter::new().with_discipline("matematica"),
            Pagination::new(1, 100)?,
        )
        .await?;

    assert_eq!(page.total, 15);
    let years: HashSet<i64> = page.data.iter().map(|q| q.year).collect();
    assert_eq!(years, HashSet::from([2021, 2022, 2023]));

    for question in &page.data {
        assert_eq!(question.files.len(), 2);
        let with_image: Vec<&str> = question
            .alternatives
            .iter()
            .filter(|alt| alt.file_path.is_some())
            .map(|alt| alt.letter.as_str())
            .collect();
        assert_eq!(with_image, vec!["C"]);
    }

    Ok(())
}

/// Test that an unknown slug is an empty result, not an error
#[tokio::test]
async fn test_listQuestions_withUnknownDiscipline_shouldReturnEmptyEnvelope() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(
            &QuestionFilter::new().with_discipline("astrologia"),
            Pagination::default(),
        )
        .await?;

    assert!(page.data.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);

    Ok(())
}

/// Test that questions without a discipline only match unfiltered listings
#[tokio::test]
async fn test_listQuestions_withQuestionMissingDiscipline_shouldOnlyAppearUnfiltered() -> Result<()> {
    let repository = common::seeded_repository();

    let by_year = repository
        .list_questions(&QuestionFilter::new().with_year(2020), Pagination::default())
        .await?;
    assert_eq!(by_year.total, 1);
    assert_eq!(by_year.data[0].id, FIRST_QUESTION_ID);

    let by_discipline = repository
        .list_questions(
            &QuestionFilter::new().with_year(2020).with_discipline("linguagens"),
            Pagination::default(),
        )
        .await?;
    assert_eq!(by_discipline.total, 0);

    Ok(())
}

/// Test full hydration of a single question
#[tokio::test]
async fn test_getQuestionById_shouldHydrateAlternativesAndFiles() -> Result<()> {
    let repository = common::seeded_repository();

    let question = repository
        .get_question_by_id(LAST_QUESTION_ID)
        .await?
        .expect("question should exist");

    assert_eq!(question.year, 2023);
    assert_eq!(question.index, 140);
    assert_eq!(question.title, "Questão 140 - ENEM 2023");
    assert_eq!(question.discipline.as_ref().map(|d| d.value.as_str()), Some("matematica"));
    assert!(question.language.is_none());
    assert_eq!(question.correct_alternative.as_deref(), common::expected_answer(140));

    let letters: Vec<&str> = question.alternatives.iter().map(|a| a.letter.as_str()).collect();
    assert_eq!(letters, LETTERS.to_vec());

    let correct: Vec<&str> = question
        .alternatives
        .iter()
        .filter(|a| a.is_correct)
        .map(|a| a.letter.as_str())
        .collect();
    assert_eq!(correct, vec!["A"]);

    assert_eq!(
        question.files,
        vec![
            "images/2023/140/figura-1.png".to_string(),
            "images/2023/140/figura-2.png".to_string(),
        ]
    );

    Ok(())
}

/// Test lookups of ids that do not exist
#[tokio::test]
async fn test_getQuestionById_withUnknownIds_shouldReturnNone() -> Result<()> {
    let repository = common::seeded_repository();

    assert!(repository.get_question_by_id(99_999).await?.is_none());
    assert!(repository.get_question_by_id(0).await?.is_none());
    assert!(repository.get_question_by_id(-1).await?.is_none());

    Ok(())
}

/// Test that blank loader values come back absent
#[tokio::test]
async fn test_getQuestionById_withBlankColumns_shouldOmitThem() -> Result<()> {
    let repository = common::seeded_repository();
    let page = repository
        .list_questions(
            &QuestionFilter::new().with_year(2021).with_discipline("ciencias-humanas"),
            Pagination::default(),
        )
        .await?;

    let unanswered = page
        .data
        .iter()
        .find(|q| q.index == UNANSWERED_INDEX)
        .expect("fixture has an unanswered question");
    assert!(unanswered.correct_alternative.is_none());
    assert!(unanswered.correct_option().is_none());

    for question in &page.data {
        assert_eq!(question.context.is_some(), question.index % 2 == 1);
        assert_eq!(
            question.alternatives_introduction.as_deref(),
            Some("Assinale a alternativa correta.")
        );
    }

    Ok(())
}

/// Test that every listed question is returned unchanged by id
#[tokio::test]
async fn test_getQuestionById_forEveryListedQuestion_shouldMatchListing() -> Result<()> {
    let repository = common::seeded_repository();

    let page = repository
        .list_questions(&QuestionFilter::new(), Pagination::new(1, 100)?)
        .await?;
    assert_eq!(page.data.len() as i64, TOTAL_QUESTIONS);

    for listed in &page.data {
        let fetched = repository.get_question_by_id(listed.id).await?;
        assert_eq!(fetched.as_ref(), Some(listed));

        if let Some(answer) = &listed.correct_alternative {
            let correct: Vec<_> = listed.alternatives.iter().filter(|a| a.is_correct).collect();
            assert_eq!(correct.len(), 1);
            assert_eq!(&correct[0].letter, answer);
        }
    }

    Ok(())
}

/// Test that random draws stay inside the filtered set
#[tokio::test]
async fn test_getRandomQuestion_withFilter_shouldOnlyReturnMatches() -> Result<()> {
    let repository = common::seeded_repository();
    let filter = QuestionFilter::new().with_year(2023).with_discipline("matematica");

    for _ in 0..50 {
        let question = repository
            .get_random_question(&filter)
            .await?
            .expect("filter has matches");
        assert_eq!(question.year, 2023);
        assert!((2571..=LAST_QUESTION_ID).contains(&question.id));
        assert_eq!(question.alternatives.len(), 5);
    }

    Ok(())
}

/// Test that every match is drawn with roughly equal frequency
#[tokio::test]
async fn test_getRandomQuestion_overManyDraws_shouldBeUniform() -> Result<()> {
    let repository = common::seeded_repository();
    let filter = QuestionFilter::new()
        .with_year(2022)
        .with_discipline("linguagens")
        .with_language("ingles");

    const DRAWS: usize = 2500;
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for _ in 0..DRAWS {
        let question = repository
            .get_random_question(&filter)
            .await?
            .expect("filter has matches");
        *counts.entry(question.id).or_default() += 1;
    }

    // Five candidates, 500 expected each with a standard deviation of 20
    assert_eq!(counts.len(), 5);
    for (id, count) in &counts {
        assert!(
            (350..=650).contains(count),
            "question {} drawn {} times out of {}",
            id,
            count,
            DRAWS
        );
    }

    Ok(())
}

/// Test a random draw with nothing to draw from
#[tokio::test]
async fn test_getRandomQuestion_withNoMatch_shouldReturnNone() -> Result<()> {
    let repository = common::seeded_repository();

    let question = repository
        .get_random_question(&QuestionFilter::new().with_year(1998))
        .await?;
    assert!(question.is_none());

    let empty = common::empty_repository();
    assert!(empty.get_random_question(&QuestionFilter::new()).await?.is_none());

    Ok(())
}

/// Test the catalog enumerations
#[tokio::test]
async fn test_enumerations_shouldBeDistinctAndOrdered() -> Result<()> {
    let repository = common::seeded_repository();

    assert_eq!(repository.list_years().await?, SEEDED_YEARS.to_vec());

    let disciplines: Vec<String> = repository
        .list_disciplines()
        .await?
        .into_iter()
        .map(|d| d.value)
        .collect();
    assert_eq!(
        disciplines,
        vec!["ciencias-humanas", "ciencias-natureza", "linguagens", "matematica"]
    );

    let languages: Vec<String> = repository
        .list_languages()
        .await?
        .into_iter()
        .map(|l| l.label)
        .collect();
    assert_eq!(languages, vec!["Espanhol", "Inglês"]);

    Ok(())
}

/// Test enumerations over an empty store
#[tokio::test]
async fn test_enumerations_withEmptyStore_shouldReturnEmptyLists() -> Result<()> {
    let repository = common::empty_repository();

    assert!(repository.list_years().await?.is_empty());
    assert!(repository.list_disciplines().await?.is_empty());
    assert!(repository.list_languages().await?.is_empty());

    let page = repository
        .list_questions(&QuestionFilter::new(), Pagination::default())
        .await?;
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);

    Ok(())
}

/// Test that an export equals the concatenated listing
#[tokio::test]
async fn test_exportQuestions_shouldMatchListingOrder() -> Result<()> {
    let repository = common::seeded_repository();
    let filter = QuestionFilter::new().with_year(2021);

    let exported = repository.export_questions(&filter).await?;
    let listed = repository.list_questions(&filter, Pagination::new(1, 100)?).await?;

    assert_eq!(exported.len() as i64, QUESTIONS_PER_YEAR);
    assert_eq!(exported, listed.data);

    Ok(())
}
