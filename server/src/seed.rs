use search_core::CourseDraft;

fn course(title: &str, description: &str, category: &str, platform: &str, rating: &str, price: &str) -> CourseDraft {
    CourseDraft {
        title: title.into(),
        description: Some(description.into()),
        category: Some(category.into()),
        platform: platform.into(),
        rating: Some(rating.into()),
        price: Some(price.into()),
        ..Default::default()
    }
}

/// Demo catalog used when the server starts with `--seed` and no snapshot.
pub fn sample_courses() -> Vec<CourseDraft> {
    vec![
        course(
            "Complete Python Bootcamp",
            "Learn Python like a Professional! Start from the basics and go all the way to creating your own applications and games",
            "Development",
            "Udemy",
            "4.6",
            "$19.99",
        ),
        course(
            "Java Programming Masterclass",
            "Learn Java In This Comprehensive Course. Master the core Java skills needed to apply for Java Developer positions",
            "Development",
            "Udemy",
            "4.5",
            "$24.99",
        ),
        course(
            "Machine Learning A-Z",
            "Learn to create Machine Learning Algorithms in Python and R from two Data Science experts. Code templates included.",
            "Data Science",
            "Coursera",
            "4.7",
            "Free",
        ),
        course(
            "The Web Developer Bootcamp",
            "The only course you need to learn web development - HTML, CSS, JS, Node, and More!",
            "Development",
            "Udemy",
            "4.8",
            "$14.99",
        ),
        course(
            "CS50's Introduction to Computer Science",
            "An introduction to the intellectual enterprises of computer science and the art of programming.",
            "Computer Science",
            "Harvard",
            "4.9",
            "Free",
        ),
    ]
}
