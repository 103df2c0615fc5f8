use super::{
    models::{
        AICharacter,
        AlphabetItem,
        BookRecommendation,
        Course,
        CultureItem,
        DictionaryEntry,
        Exercise,
        GrammarLesson,
        Lesson,
        Unit,
    },
    repository::Record,
    LexyError,
};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(fields: &[&String], message: &str) -> Result<(), LexyError> {
    if fields.iter().any(|field| is_blank(field)) {
        Err(LexyError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

impl Record for DictionaryEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.word, &self.translation], "Please fill in both the word and its translation.")
    }
}

impl Record for GrammarLesson {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.title, &self.content], "Please provide both a title and the rule content.")
    }
}

impl Record for CultureItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.title, &self.description], "Please fill in the title and description.")
    }
}

impl Record for AICharacter {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(
            &[&self.name, &self.role, &self.personality],
            "Please fill in Name, Role, and Personality.",
        )
    }
}

impl Record for BookRecommendation {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.title, &self.author], "Please fill in the title and author.")
    }
}

impl Record for AlphabetItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.character], "Please enter a character.")
    }
}

impl Record for Exercise {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.question], "Please enter the exercise question.")
    }
}

impl Record for Lesson {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.title], "Please enter a lesson title.")
    }
}

impl Record for Unit {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(&[&self.title], "Please enter a unit title.")
    }
}

impl Record for Course {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), LexyError> {
        require(
            &[&self.course_title, &self.language],
            "Please fill in the 'Basics' (Target Language & Course Title) first!",
        )
    }
}
